//! Date token parsing shared by the log and holiday readers.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// `D.M.YYYY`, day and month with or without a leading zero.
static DOTTED_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").unwrap());

/// `YYYY-MM-DD`.
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Errors raised while reading operator-maintained input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The date token did not parse.
    #[error("line {line}: invalid date {value:?}")]
    InvalidDate { line: usize, value: String },

    /// The hours column was not a number.
    #[error("line {line}: invalid hours {value:?}")]
    InvalidHours { line: usize, value: String },

    /// The hours column was negative.
    #[error("line {line}: hours cannot be negative, got {value}")]
    NegativeHours { line: usize, value: f64 },

    /// A required column was absent.
    #[error("line {line}: missing {field} column")]
    MissingField { line: usize, field: &'static str },

    /// A `YYYY-MM` month key did not parse.
    #[error("invalid month key {value:?}")]
    InvalidMonth { value: String },
}

/// Shape of a date token, decided before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateShape {
    Dotted,
    Iso,
}

impl DateShape {
    pub(crate) fn sniff(token: &str) -> Option<Self> {
        if DOTTED_DATE_RE.is_match(token) {
            Some(Self::Dotted)
        } else if ISO_DATE_RE.is_match(token) {
            Some(Self::Iso)
        } else {
            None
        }
    }

    const fn format(self) -> &'static str {
        match self {
            Self::Dotted => "%d.%m.%Y",
            Self::Iso => "%Y-%m-%d",
        }
    }
}

/// Parses a date token of the given shape, reporting `line` on failure.
pub(crate) fn parse_date(token: &str, shape: DateShape, line: usize) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(token, shape.format()).map_err(|_| ParseError::InvalidDate {
        line,
        value: token.to_string(),
    })
}

/// Parses a `D.M.YYYY` token.
pub(crate) fn parse_dotted(token: &str, line: usize) -> Result<NaiveDate, ParseError> {
    match DateShape::sniff(token) {
        Some(DateShape::Dotted) => parse_date(token, DateShape::Dotted, line),
        _ => Err(ParseError::InvalidDate {
            line,
            value: token.to_string(),
        }),
    }
}

/// Parses a `YYYY-MM` month key into `(year, month)`.
pub fn parse_year_month(key: &str) -> Result<(i32, u32), ParseError> {
    let invalid = || ParseError::InvalidMonth {
        value: key.to_string(),
    };
    let (year, month) = key.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
