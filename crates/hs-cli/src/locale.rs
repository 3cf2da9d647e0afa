//! Report message templates in Finnish and English.

use clap::ValueEnum;
use hs_core::MonthDays;
use serde::{Deserialize, Serialize};

const FINNISH_MONTHS: [&str; 12] = [
    "Tammikuu",
    "Helmikuu",
    "Maaliskuu",
    "Huhtikuu",
    "Toukokuu",
    "Kesäkuu",
    "Heinäkuu",
    "Elokuu",
    "Syyskuu",
    "Lokakuu",
    "Marraskuu",
    "Joulukuu",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Report language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fi,
    En,
}

/// Hours with at most two decimals, whole numbers as `165.0`.
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

/// Percentage with one decimal.
pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.1}")
}

/// Signed difference with one decimal, e.g. `+2.5` or `-7.5`.
pub fn format_diff(diff: f64) -> String {
    format!("{diff:+.1}")
}

impl Language {
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            Self::Fi => &FINNISH_MONTHS,
            Self::En => &ENGLISH_MONTHS,
        };
        month
            .checked_sub(1)
            .and_then(|idx| names.get(idx as usize))
            .copied()
            .unwrap_or("?")
    }

    pub fn unknown_project(self, project: &str) -> String {
        match self {
            Self::Fi => format!("*** Tuntematon projekti {project}, oletetaan laskuttamaton"),
            Self::En => format!("*** Unknown project {project}, assuming it's non-billable"),
        }
    }

    pub fn year_heading(self, year: i32) -> String {
        match self {
            Self::Fi => format!("#### Vuosi {year} #####"),
            Self::En => format!("#### Year {year} #####"),
        }
    }

    pub fn month_heading(self, year: i32, month: u32, days: Option<&MonthDays>) -> String {
        let name = self.month_name(month);
        let Some(days) = days else {
            return format!("  ### {name} {year}");
        };
        let MonthDays {
            business_days,
            holidays,
            work_days,
        } = days;
        match self {
            Self::Fi => format!(
                "  ### {name} {year} ({business_days} arkipäivää, {holidays} arkipäiviin osuvaa vapaapäivää ja {work_days} työpäivää)"
            ),
            Self::En => format!(
                "  ### {name} {year} ({business_days} business days, {holidays} holidays and {work_days} work days)"
            ),
        }
    }

    pub fn month_total(self, done: f64, expected: f64, diff: Option<f64>) -> String {
        let done = format_hours(done);
        let expected = format_hours(expected);
        let diff = diff.map(|d| format!(" ({})", format_diff(d))).unwrap_or_default();
        match self {
            Self::Fi => format!("  Yhteensä {done} h kuukauden {expected} työtunnista{diff} joista"),
            Self::En => format!("  Total of {done} h out of {expected} of the month{diff}, out of which"),
        }
    }

    pub fn billable(self, hours: f64, ratio: f64) -> String {
        let hours = format_hours(hours);
        let ratio = format_ratio(ratio);
        match self {
            Self::Fi => format!("    - laskutettavia {hours} h, laskutusaste {ratio} %"),
            Self::En => format!("    - billable {hours} h, billing ratio {ratio} %"),
        }
    }

    pub fn non_billable(self, hours: f64, ratio: f64) -> String {
        let hours = format_hours(hours);
        let ratio = format_ratio(ratio);
        match self {
            Self::Fi => {
                format!("    - laskutettamattomia {hours} h, laskuttamattomuusaste {ratio} %")
            }
            Self::En => format!("    - non-billable {hours} h, non-billing ratio {ratio} %"),
        }
    }

    pub fn code_hours(self, code: &str, hours: f64) -> String {
        format!("       {}\t{code}", format_hours(hours))
    }

    /// First line of a year's summary.
    pub fn year_total_heading(self, year: i32, hours_per_day: Option<f64>) -> String {
        match (self, hours_per_day) {
            (Self::Fi, Some(hpd)) => format!(
                "Vuonna {year} yhteensä (olettaen {} h työpäivän):",
                format_hours(hpd)
            ),
            (Self::Fi, None) => format!("Vuonna {year} yhteensä:"),
            (Self::En, Some(hpd)) => format!(
                "Year {year} total (assuming {} h working day):",
                format_hours(hpd)
            ),
            (Self::En, None) => format!("Year {year} total:"),
        }
    }

    /// Second line of a year's summary.
    pub fn year_total(
        self,
        done: f64,
        expected: f64,
        diff: Option<f64>,
        billable: f64,
        ratio: f64,
    ) -> String {
        let done = format_hours(done);
        let expected = format_hours(expected);
        let billable = format_hours(billable);
        let ratio = format_ratio(ratio);
        let diff = diff.map(|d| format!(" ({})", format_diff(d))).unwrap_or_default();
        match self {
            Self::Fi => format!(
                "{done} h vuoden {expected} työtunnista{diff} joista laskutettavia {billable} h, laskutusaste {ratio} %"
            ),
            Self::En => format!(
                "{done} h out of {expected} hours of the year{diff}, out of which {billable} h billable, billing ratio {ratio} %"
            ),
        }
    }
}
