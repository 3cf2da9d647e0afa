//! Core engine for hour-log billing reports.
//!
//! This crate contains the fundamental types and logic for:
//! - Parsing: legacy and extended hour-log lines, holiday lists
//! - Ledger: accumulating hours per year, month and hour-code
//! - Billing: classifying hour-codes against a project registry
//! - Calendar: business days and expected hours per month
//! - Reports: billable/non-billable splits, ratios and year totals

pub mod billing;
pub mod calendar;
mod date;
pub mod entry;
pub mod holiday;
pub mod ledger;
pub mod report;

pub use billing::{ABSENCE_CODE, Billability, ProjectEntry, ProjectRegistry, RegistryError};
pub use calendar::{MonthDays, WorkCalendar, business_days_between, hours_per_day_for_year};
pub use date::{ParseError, parse_year_month};
pub use entry::{LogEntry, LogLine, parse_log};
pub use holiday::{Convention, HolidayCalendar, HolidayRecord, parse_holidays};
pub use ledger::{CodeHours, HourLedger, MonthHours};
pub use report::{
    Expectation, MonthExpectation, MonthReport, ReportAggregator, RequiredHours, YearReport, ratio,
};
