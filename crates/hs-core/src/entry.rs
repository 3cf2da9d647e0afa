//! Hour-log line parsing.
//!
//! Two tab-separated layouts are in use:
//!
//! - legacy: `D.M.YYYY \t hours \t code \t ...`
//! - extended: `YYYY-MM-DD \t id \t start \t end \t hours \t code`
//!
//! The layout is decided per line from the shape of the date token.

use chrono::NaiveDate;

use crate::date::{DateShape, ParseError, parse_date};

/// One logged amount of time against an hour-code.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub code: String,
    pub hours: f64,
}

/// A parsed log line in one of the two on-disk layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    Legacy {
        date: NaiveDate,
        hours: f64,
        code: String,
    },
    Extended {
        date: NaiveDate,
        id: String,
        start: String,
        end: String,
        hours: f64,
        code: String,
    },
}

impl LogLine {
    /// Parses one line. Returns `Ok(None)` for blank lines, comments and
    /// legacy lines that carry no hours column.
    pub fn parse(raw: &str, line: usize) -> Result<Option<Self>, ParseError> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        let trimmed = raw.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let columns: Vec<&str> = raw.split('\t').map(str::trim).collect();
        let token = columns[0];
        let shape = DateShape::sniff(token).ok_or_else(|| ParseError::InvalidDate {
            line,
            value: token.to_string(),
        })?;
        let date = parse_date(token, shape, line)?;

        match shape {
            DateShape::Dotted => {
                let Some(hours) = columns.get(1).filter(|h| !h.is_empty()) else {
                    return Ok(None);
                };
                let hours = parse_hours(hours, line)?;
                let code = required(&columns, 2, "code", line)?;
                Ok(Some(Self::Legacy { date, hours, code }))
            }
            DateShape::Iso => Ok(Some(Self::Extended {
                date,
                id: required(&columns, 1, "id", line)?,
                start: required(&columns, 2, "start", line)?,
                end: required(&columns, 3, "end", line)?,
                hours: parse_hours(&required(&columns, 4, "hours", line)?, line)?,
                code: required(&columns, 5, "code", line)?,
            })),
        }
    }

    /// Drops the layout-specific columns.
    pub fn into_entry(self) -> LogEntry {
        match self {
            Self::Legacy { date, hours, code } | Self::Extended { date, hours, code, .. } => {
                LogEntry { date, code, hours }
            }
        }
    }
}

fn required(
    columns: &[&str],
    index: usize,
    field: &'static str,
    line: usize,
) -> Result<String, ParseError> {
    columns
        .get(index)
        .filter(|value| !value.is_empty())
        .map(|value| (*value).to_string())
        .ok_or(ParseError::MissingField { line, field })
}

/// Parses an hours amount, accepting `,` as the decimal separator.
fn parse_hours(value: &str, line: usize) -> Result<f64, ParseError> {
    let hours: f64 = value
        .replace(',', ".")
        .parse()
        .ok()
        .filter(|h: &f64| h.is_finite())
        .ok_or_else(|| ParseError::InvalidHours {
            line,
            value: value.to_string(),
        })?;
    if hours < 0.0 {
        return Err(ParseError::NegativeHours { line, value: hours });
    }
    Ok(hours)
}

/// Parses a whole log file. Line numbers in errors are 1-based.
pub fn parse_log(text: &str) -> Result<Vec<LogEntry>, ParseError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if let Some(line) = LogLine::parse(raw, idx + 1)? {
            entries.push(line.into_entry());
        }
    }
    Ok(entries)
}
