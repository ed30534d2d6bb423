//! Domain layer: blueprint tree, expansion state and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod expansion;
pub mod layout;
pub mod parser;

pub use entities::*;
pub use error::{ParseError, ParseResult};
pub use expansion::ExpansionState;
pub use layout::{
    layout, Layout, LayoutEdge, LayoutEngine, LayoutMetrics, LayoutNode, NodeKind, Position, Size,
};
pub use parser::{parse, parse_value};
