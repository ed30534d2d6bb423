//! Application layer: controller, session and services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod controller;
pub mod error;
pub mod error_ext;
pub mod services;
pub mod session;

pub use controller::{Gesture, OutlineRow, Target, TreeController};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use session::ViewSession;
