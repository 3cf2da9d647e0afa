//! Monthly and yearly billing reports.
//!
//! The aggregator walks the ledger year by year and month by month, splits
//! each month's codes into billable and non-billable, and compares the
//! result against the hours the month was expected to hold. Where that
//! expectation comes from is abstracted behind [`Expectation`]: local logs
//! derive it from the business calendar, the remote service reports it.

use std::collections::BTreeMap;

use crate::billing::{Billability, ProjectRegistry};
use crate::calendar::MonthDays;
use crate::ledger::{CodeHours, HourLedger};

/// `100 * part / whole` rounded to one decimal; 0 when `whole` is 0.
pub fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    (part / whole * 1000.0).round() / 10.0
}

/// Expected hours for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthExpectation {
    /// Day counts, when the expectation was computed from a calendar.
    pub days: Option<MonthDays>,
    pub expected_hours: f64,
}

/// Source of expected hours per month.
pub trait Expectation {
    /// Whether the month belongs in the report at all.
    fn includes(&self, year: i32, month: u32) -> bool {
        let _ = (year, month);
        true
    }

    fn month(&self, year: i32, month: u32) -> MonthExpectation;

    /// Assumed working-day length, when the source has one.
    fn hours_per_day(&self, year: i32) -> Option<f64> {
        let _ = year;
        None
    }
}

/// Expected hours as reported by the remote service, keyed by month.
///
/// Months at or after `cutoff` are excluded from reports.
#[derive(Debug, Clone)]
pub struct RequiredHours {
    by_month: BTreeMap<(i32, u32), f64>,
    cutoff: (i32, u32),
}

impl RequiredHours {
    pub const fn new(by_month: BTreeMap<(i32, u32), f64>, cutoff: (i32, u32)) -> Self {
        Self { by_month, cutoff }
    }
}

impl Expectation for RequiredHours {
    fn includes(&self, year: i32, month: u32) -> bool {
        (year, month) < self.cutoff
    }

    fn month(&self, year: i32, month: u32) -> MonthExpectation {
        let expected_hours = self.by_month.get(&(year, month)).copied().unwrap_or_else(|| {
            tracing::warn!(year, month, "no required hours reported, assuming 0");
            0.0
        });
        MonthExpectation {
            days: None,
            expected_hours,
        }
    }
}

/// One month of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthReport {
    pub year: i32,
    pub month: u32,
    pub days: Option<MonthDays>,
    pub expected_hours: f64,
    pub total_hours: f64,
    pub billable_hours: f64,
    pub non_billable_hours: f64,
    /// Non-zero billable codes, most hours first.
    pub billable: Vec<(String, f64)>,
    /// Non-zero non-billable codes, most hours first.
    pub non_billable: Vec<(String, f64)>,
    /// Project of every code that was not in the registry, one per code.
    pub unknown_projects: Vec<String>,
}

impl MonthReport {
    pub fn billable_ratio(&self) -> f64 {
        ratio(self.billable_hours, self.expected_hours)
    }

    pub fn non_billable_ratio(&self) -> f64 {
        ratio(self.non_billable_hours, self.expected_hours)
    }

    /// Logged minus expected hours.
    pub fn diff(&self) -> f64 {
        self.total_hours - self.expected_hours
    }
}

/// One year of the report with its months.
#[derive(Debug, Clone, PartialEq)]
pub struct YearReport {
    pub year: i32,
    pub months: Vec<MonthReport>,
    pub total_hours: f64,
    pub billable_hours: f64,
    pub expected_hours: f64,
    pub hours_per_day: Option<f64>,
}

impl YearReport {
    pub fn billing_ratio(&self) -> f64 {
        ratio(self.billable_hours, self.expected_hours)
    }

    pub fn diff(&self) -> f64 {
        self.total_hours - self.expected_hours
    }
}

/// Builds reports from a ledger, a registry and an expectation source.
#[derive(Debug)]
pub struct ReportAggregator<'a, E> {
    registry: &'a ProjectRegistry,
    expectation: &'a E,
}

impl<'a, E: Expectation> ReportAggregator<'a, E> {
    pub const fn new(registry: &'a ProjectRegistry, expectation: &'a E) -> Self {
        Self {
            registry,
            expectation,
        }
    }

    /// Reports for every year in the ledger, ascending. Years left without
    /// any included month are dropped.
    pub fn build(&self, ledger: &HourLedger) -> Vec<YearReport> {
        let mut years = Vec::new();
        for (year, months) in ledger.years() {
            let months: Vec<MonthReport> = months
                .iter()
                .filter(|(month, _)| self.expectation.includes(year, **month))
                .map(|(month, codes)| self.month(year, *month, codes))
                .collect();
            if months.is_empty() {
                continue;
            }
            years.push(YearReport {
                year,
                total_hours: months.iter().map(|m| m.total_hours).sum(),
                billable_hours: months.iter().map(|m| m.billable_hours).sum(),
                expected_hours: months.iter().map(|m| m.expected_hours).sum(),
                hours_per_day: self.expectation.hours_per_day(year),
                months,
            });
        }
        years
    }

    fn month(&self, year: i32, month: u32, codes: &CodeHours) -> MonthReport {
        let mut billable = Vec::new();
        let mut non_billable = Vec::new();
        let mut unknown_projects = Vec::new();

        // The ledger holds one total per code and month, so an unknown
        // project is flagged once per code in each month it appears.
        for (code, hours) in codes {
            match self.registry.classify(code) {
                Billability::Billable => billable.push((code.clone(), *hours)),
                Billability::NonBillable => non_billable.push((code.clone(), *hours)),
                Billability::Unknown { project } => {
                    unknown_projects.push(project);
                    non_billable.push((code.clone(), *hours));
                }
            }
        }

        let billable_hours: f64 = billable.iter().map(|(_, h)| h).sum();
        let non_billable_hours: f64 = non_billable.iter().map(|(_, h)| h).sum();
        let expectation = self.expectation.month(year, month);

        tracing::debug!(
            year,
            month,
            billable_hours,
            non_billable_hours,
            expected_hours = expectation.expected_hours,
            "aggregated month"
        );

        MonthReport {
            year,
            month,
            days: expectation.days,
            expected_hours: expectation.expected_hours,
            total_hours: billable_hours + non_billable_hours,
            billable_hours,
            non_billable_hours,
            billable: descending_nonzero(billable),
            non_billable: descending_nonzero(non_billable),
            unknown_projects,
        }
    }
}

/// Drops zero-hour codes and sorts by hours, largest first. Ties keep their order.
fn descending_nonzero(mut codes: Vec<(String, f64)>) -> Vec<(String, f64)> {
    codes.retain(|(_, hours)| *hours > 0.0);
    codes.sort_by(|a, b| b.1.total_cmp(&a.1));
    codes
}
