//! hours-stat CLI library.
//!
//! This crate provides the CLI interface, configuration, message templates
//! and local file access around the `hs-core` report engine.

mod cli;
pub mod commands;
mod config;
pub mod locale;
pub mod render;
pub mod source;

pub use cli::{Cli, Commands};
pub use config::{Config, ReportSettings};
pub use locale::Language;
pub use render::RenderOptions;
