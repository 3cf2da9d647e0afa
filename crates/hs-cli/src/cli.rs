//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::locale::Language;

/// Billing reports from work-hour logs.
///
/// Sums logged hours per month and year, splits them into billable and
/// non-billable by project, and compares them with the working hours the
/// calendar expects.
#[derive(Debug, Parser)]
#[command(name = "hours-stat", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Report language.
    #[arg(long, global = true, value_enum)]
    pub lang: Option<Language>,

    /// Number of working hours per day. If not given, guessed per year.
    #[arg(long, global = true, value_parser = parse_hours_per_day)]
    pub hours: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report from the local hours directory (the default).
    Local,

    /// Report from the remote time-tracking service.
    Web {
        /// Server, e.g. hours.example.com.
        #[arg(long)]
        server: Option<String>,

        /// Session cookie copied from the browser.
        #[arg(long)]
        session: Option<String>,
    },
}

fn parse_hours_per_day(value: &str) -> Result<f64, String> {
    let hours: f64 = value
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("not a number: {value}"))?;
    if !(hours.is_finite() && hours > 0.0 && hours <= 24.0) {
        return Err(format!("hours per day must be between 0 and 24, got {value}"));
    }
    Ok(hours)
}
