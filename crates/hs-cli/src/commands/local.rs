//! `hours-stat local`: report from the local hours directory.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use hs_core::{HolidayCalendar, HourLedger, ReportAggregator, WorkCalendar};

use crate::config::Config;
use crate::render::{RenderOptions, render};
use crate::source::HoursDir;

/// Builds and prints the local report as of `today`.
pub fn run<W: Write, D: Write>(
    out: &mut W,
    diag: &mut D,
    config: &Config,
    today: NaiveDate,
    color: bool,
) -> Result<()> {
    let settings = config.report_settings();
    let dir = HoursDir::new(&config.hours_dir);
    tracing::debug!(hours_dir = %config.hours_dir.display(), "reading local hours");

    let registry = dir.read_registry()?;
    let holidays = HolidayCalendar::load(&dir.read_holidays()?, today);
    let entries = dir.read_entries()?;
    let ledger = HourLedger::from_entries(&entries, today);
    if ledger.is_empty() {
        tracing::debug!("no hours logged up to today, nothing to report");
        return Ok(());
    }
    tracing::debug!(entries = entries.len(), "built hour ledger");

    let calendar = WorkCalendar::new(&holidays, settings.hours_per_day, today);
    let years = ReportAggregator::new(&registry, &calendar).build(&ledger);

    let options = RenderOptions {
        language: settings.language,
        show_diff: false,
        color,
    };
    render(out, diag, &years, &options)?;
    Ok(())
}
