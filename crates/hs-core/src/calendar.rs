//! Business days and expected working hours.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::holiday::{Convention, HolidayCalendar};
use crate::report::{Expectation, MonthExpectation};

/// Counts Monday-to-Friday days in the half-open range `(start, end]`.
///
/// Closed form over whole weeks plus a remainder; `start` itself is never
/// counted, so callers wanting a full month pass the day before the 1st.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let days_between = (end - start).num_days();
    if days_between <= 0 {
        return 0;
    }
    let whole_weeks = days_between / 7;
    let mut extra_days = days_between % 7;

    if extra_days != 0 {
        let next = start + Days::new(1);
        if next.weekday().num_days_from_sunday() <= end.weekday().num_days_from_sunday() {
            extra_days -= i64::from(next.weekday() == Weekday::Sun);
            extra_days -= i64::from(end.weekday() == Weekday::Sat);
        } else {
            extra_days -= 2;
        }
    }

    whole_weeks * 5 + extra_days
}

/// Working-day length for a year: the override when given, else the convention's.
pub fn hours_per_day_for_year(hours_override: Option<f64>, convention: Convention) -> f64 {
    hours_override.unwrap_or_else(|| convention.hours_per_day())
}

/// First and last day of a month.
fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(chrono::Months::new(1))?;
    Some((first, next.pred_opt()?))
}

/// Day counts behind a month's expected hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDays {
    pub business_days: i64,
    pub holidays: i64,
    pub work_days: i64,
}

/// Expected hours derived from business days and observed holidays.
#[derive(Debug, Clone)]
pub struct WorkCalendar<'a> {
    holidays: &'a HolidayCalendar,
    hours_override: Option<f64>,
    today: NaiveDate,
}

impl<'a> WorkCalendar<'a> {
    pub const fn new(
        holidays: &'a HolidayCalendar,
        hours_override: Option<f64>,
        today: NaiveDate,
    ) -> Self {
        Self {
            holidays,
            hours_override,
            today,
        }
    }

    /// Business days, holidays and work days of the month, clamped to today.
    pub fn month_days(&self, year: i32, month: u32) -> MonthDays {
        let Some((first, last)) = month_bounds(year, month) else {
            return MonthDays {
                business_days: 0,
                holidays: 0,
                work_days: 0,
            };
        };
        let before_first = first - Days::new(1);
        let business_days = business_days_between(before_first, last.min(self.today));
        let holidays = i64::from(self.holidays.holidays_in_month(year, month));
        MonthDays {
            business_days,
            holidays,
            work_days: business_days - holidays,
        }
    }

    /// `hours_per_day * work days` for the month, up to today.
    #[expect(clippy::cast_precision_loss, reason = "day counts are far below 2^52")]
    pub fn expected_monthly_hours(&self, year: i32, month: u32, hours_per_day: f64) -> f64 {
        hours_per_day * self.month_days(year, month).work_days as f64
    }

    pub fn hours_per_day_for_year(&self, year: i32) -> f64 {
        hours_per_day_for_year(self.hours_override, self.holidays.convention_for_year(year))
    }
}

impl Expectation for WorkCalendar<'_> {
    #[expect(clippy::cast_precision_loss, reason = "day counts are far below 2^52")]
    fn month(&self, year: i32, month: u32) -> MonthExpectation {
        let days = self.month_days(year, month);
        let hours_per_day = self.hours_per_day_for_year(year);
        MonthExpectation {
            days: Some(days),
            expected_hours: hours_per_day * days.work_days as f64,
        }
    }

    fn hours_per_day(&self, year: i32) -> Option<f64> {
        Some(self.hours_per_day_for_year(year))
    }
}
