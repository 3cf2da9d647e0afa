//! Holiday list parsing and per-month holiday counts.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::date::{ParseError, parse_dotted};

/// Label fragments naming Finnish public holidays.
const FINNISH_MARKERS: &[&str] = &[
    "uuden",
    "loppiai",
    "pääsiäis",
    "helatorstai",
    "vappu",
    "juhannus",
    "itsenäisyys",
    "joulu",
];

/// Label fragments naming US federal holidays.
const AMERICAN_MARKERS: &[&str] = &[
    "new year",
    "martin luther king",
    "washington",
    "memorial",
    "independence",
    "thanksgiving",
    "christmas",
];

/// Working-hours convention observed in a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Convention {
    #[default]
    Finnish,
    American,
}

impl Convention {
    /// Default length of a working day under this convention.
    pub const fn hours_per_day(self) -> f64 {
        match self {
            Self::Finnish => 7.5,
            Self::American => 8.0,
        }
    }

    /// Infers the convention from a holiday label, Finnish markers first.
    fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if FINNISH_MARKERS.iter().any(|m| label.contains(m)) {
            Some(Self::Finnish)
        } else if AMERICAN_MARKERS.iter().any(|m| label.contains(m)) {
            Some(Self::American)
        } else {
            None
        }
    }
}

/// One line of the holiday list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub label: String,
}

/// Parses `D.M.YYYY label` lines. Blank lines and `#` comments are skipped.
pub fn parse_holidays(text: &str) -> Result<Vec<HolidayRecord>, ParseError> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (token, label) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        records.push(HolidayRecord {
            date: parse_dotted(token, idx + 1)?,
            label: label.trim().to_string(),
        });
    }
    Ok(records)
}

/// Observed holidays per month and the inferred convention per year.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    per_month: BTreeMap<(i32, u32), u32>,
    conventions: BTreeMap<i32, Convention>,
}

impl HolidayCalendar {
    /// Builds the calendar as seen on `today`.
    ///
    /// A holiday counts only when it falls on Monday to Friday and is not
    /// after `today`. A date listed twice counts once. The first record of a
    /// year whose label names a known holiday fixes that year's convention.
    pub fn load(records: &[HolidayRecord], today: NaiveDate) -> Self {
        let observed: BTreeSet<NaiveDate> = records
            .iter()
            .map(|r| r.date)
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) && *d <= today)
            .collect();

        let mut per_month = BTreeMap::new();
        for date in observed {
            *per_month.entry((date.year(), date.month())).or_insert(0) += 1;
        }

        let mut conventions = BTreeMap::new();
        for record in records {
            if let Some(convention) = Convention::from_label(&record.label) {
                conventions.entry(record.date.year()).or_insert(convention);
            }
        }

        tracing::debug!(
            holidays = records.len(),
            months = per_month.len(),
            ?conventions,
            "loaded holiday calendar"
        );

        Self {
            per_month,
            conventions,
        }
    }

    /// Number of observed weekday holidays in the month.
    pub fn holidays_in_month(&self, year: i32, month: u32) -> u32 {
        self.per_month.get(&(year, month)).copied().unwrap_or(0)
    }

    /// Convention for the year, Finnish when nothing was inferred.
    pub fn convention_for_year(&self, year: i32) -> Convention {
        self.conventions.get(&year).copied().unwrap_or_default()
    }
}
