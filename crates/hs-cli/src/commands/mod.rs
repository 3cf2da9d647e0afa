//! CLI subcommand implementations.

pub mod local;
pub mod web;
