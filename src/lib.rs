//! archview: layered architecture blueprints as collapsible nested boxes
//!
//! - [`domain`]: blueprint parser, expansion state, layout engine
//! - [`application`]: tree controller, view session, blueprint loader
//! - [`infrastructure`]: I/O boundary traits and service wiring
//! - [`config`]: layered settings
//! - [`cli`]: command-line front end

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
