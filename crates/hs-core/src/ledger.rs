//! Accumulated hours per year, month and hour-code.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::entry::LogEntry;

/// Hours per hour-code within one month.
pub type CodeHours = BTreeMap<String, f64>;

/// Code totals per month (1-12) within one year.
pub type MonthHours = BTreeMap<u32, CodeHours>;

/// Year → month → hour-code → total hours.
///
/// Iteration is always year ascending, then month ascending.
#[derive(Debug, Clone, Default)]
pub struct HourLedger {
    years: BTreeMap<i32, MonthHours>,
}

impl HourLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from parsed entries, leaving out anything dated after `today`.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a LogEntry>, today: NaiveDate) -> Self {
        let mut ledger = Self::new();
        let mut skipped = 0usize;
        for entry in entries {
            if entry.date > today {
                skipped += 1;
                continue;
            }
            ledger.record(entry.date, &entry.code, entry.hours);
        }
        if skipped > 0 {
            tracing::debug!(skipped, %today, "ignored entries dated in the future");
        }
        ledger
    }

    /// Adds `hours` to the code's total for the date's month.
    pub fn record(&mut self, date: NaiveDate, code: &str, hours: f64) {
        self.record_in_month(date.year(), date.month(), code, hours);
    }

    /// Adds `hours` to the code's total for an explicit year and month.
    pub fn record_in_month(&mut self, year: i32, month: u32, code: &str, hours: f64) {
        *self
            .years
            .entry(year)
            .or_default()
            .entry(month)
            .or_default()
            .entry(code.to_string())
            .or_insert(0.0) += hours;
    }

    /// Total recorded for the triple, if anything was recorded.
    pub fn hours(&self, year: i32, month: u32, code: &str) -> Option<f64> {
        self.month(year, month)?.get(code).copied()
    }

    /// Code totals for one month.
    pub fn month(&self, year: i32, month: u32) -> Option<&CodeHours> {
        self.years.get(&year)?.get(&month)
    }

    /// Years in ascending order with their month maps.
    pub fn years(&self) -> impl Iterator<Item = (i32, &MonthHours)> {
        self.years.iter().map(|(year, months)| (*year, months))
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
