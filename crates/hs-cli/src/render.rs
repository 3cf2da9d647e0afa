//! Text rendering of year reports.

use std::io::{self, Write};

use hs_core::{MonthReport, YearReport};

use crate::locale::Language;

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub language: Language,
    /// Print `actual - expected` next to month and year totals.
    pub show_diff: bool,
    /// Color warnings on the diagnostic stream.
    pub color: bool,
}

/// Writes the report to `out` and unknown-project warnings to `diag`.
pub fn render<W: Write, D: Write>(
    out: &mut W,
    diag: &mut D,
    years: &[YearReport],
    options: &RenderOptions,
) -> io::Result<()> {
    let lang = options.language;
    for year in years {
        writeln!(out, "{}", lang.year_heading(year.year))?;
        for month in &year.months {
            warn_unknown(diag, month, options)?;
            render_month(out, month, options)?;
        }

        let diff = options.show_diff.then(|| year.diff());
        writeln!(out)?;
        writeln!(out, "{}", lang.year_total_heading(year.year, year.hours_per_day))?;
        writeln!(
            out,
            "{}",
            lang.year_total(
                year.total_hours,
                year.expected_hours,
                diff,
                year.billable_hours,
                year.billing_ratio()
            )
        )?;
        writeln!(out)?;
    }
    Ok(())
}

fn warn_unknown<D: Write>(diag: &mut D, month: &MonthReport, options: &RenderOptions) -> io::Result<()> {
    for project in &month.unknown_projects {
        let message = options.language.unknown_project(project);
        if options.color {
            writeln!(diag, "{RED}{message}{RESET}")?;
        } else {
            writeln!(diag, "{message}")?;
        }
    }
    Ok(())
}

fn render_month<W: Write>(out: &mut W, month: &MonthReport, options: &RenderOptions) -> io::Result<()> {
    let lang = options.language;
    let diff = options.show_diff.then(|| month.diff());

    writeln!(out)?;
    writeln!(out, "{}", lang.month_heading(month.year, month.month, month.days.as_ref()))?;
    writeln!(out, "{}", lang.month_total(month.total_hours, month.expected_hours, diff))?;

    writeln!(out, "{}", lang.billable(month.billable_hours, month.billable_ratio()))?;
    for (code, hours) in &month.billable {
        writeln!(out, "{}", lang.code_hours(code, *hours))?;
    }

    writeln!(
        out,
        "{}",
        lang.non_billable(month.non_billable_hours, month.non_billable_ratio())
    )?;
    for (code, hours) in &month.non_billable {
        writeln!(out, "{}", lang.code_hours(code, *hours))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use hs_core::MonthDays;
    use insta::assert_snapshot;

    use super::*;

    fn january() -> MonthReport {
        MonthReport {
            year: 2024,
            month: 1,
            days: Some(MonthDays {
                business_days: 23,
                holidays: 1,
                work_days: 22,
            }),
            expected_hours: 165.0,
            total_hours: 12.5,
            billable_hours: 7.5,
            non_billable_hours: 5.0,
            billable: vec![("PROJA-100".to_string(), 7.5)],
            non_billable: vec![("INT-1".to_string(), 3.0), ("WHAT-2".to_string(), 2.0)],
            unknown_projects: vec!["WHAT".to_string()],
        }
    }

    fn year(months: Vec<MonthReport>, hours_per_day: Option<f64>) -> YearReport {
        YearReport {
            year: 2024,
            total_hours: months.iter().map(|m| m.total_hours).sum(),
            billable_hours: months.iter().map(|m| m.billable_hours).sum(),
            expected_hours: months.iter().map(|m| m.expected_hours).sum(),
            hours_per_day,
            months,
        }
    }

    fn render_to_strings(years: &[YearReport], options: &RenderOptions) -> (String, String) {
        let mut out = Vec::new();
        let mut diag = Vec::new();
        render(&mut out, &mut diag, years, options).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(diag).unwrap(),
        )
    }

    #[test]
    fn render_local_report_en() {
        let options = RenderOptions {
            language: Language::En,
            show_diff: false,
            color: false,
        };
        let (output, _) = render_to_strings(&[year(vec![january()], Some(7.5))], &options);
        assert_snapshot!(output);
    }

    #[test]
    fn finnish_remote_report_shows_diffs() {
        let mut month = january();
        month.days = None;
        let options = RenderOptions {
            language: Language::Fi,
            show_diff: true,
            color: false,
        };
        let (output, _) = render_to_strings(&[year(vec![month], None)], &options);
        assert!(output.contains("#### Vuosi 2024 #####"));
        assert!(output.contains("  ### Tammikuu 2024\n"));
        assert!(output.contains("  Yhteensä 12.5 h kuukauden 165.0 työtunnista (-152.5) joista"));
        assert!(output.contains("    - laskutettavia 7.5 h, laskutusaste 4.5 %"));
        assert!(output.contains("Vuonna 2024 yhteensä:\n"));
        assert!(output.contains(
            "12.5 h vuoden 165.0 työtunnista (-152.5) joista laskutettavia 7.5 h, laskutusaste 4.5 %"
        ));
    }

    #[test]
    fn warnings_go_to_diagnostics_once_per_code() {
        let options = RenderOptions {
            language: Language::En,
            show_diff: false,
            color: false,
        };
        let (output, diag) = render_to_strings(&[year(vec![january()], Some(7.5))], &options);
        assert_eq!(diag, "*** Unknown project WHAT, assuming it's non-billable\n");
        assert!(!output.contains("Unknown project"));
    }

    #[test]
    fn colored_warnings_are_red() {
        let options = RenderOptions {
            language: Language::Fi,
            show_diff: false,
            color: true,
        };
        let (_, diag) = render_to_strings(&[year(vec![january()], Some(7.5))], &options);
        assert_eq!(
            diag,
            "\x1b[31m*** Tuntematon projekti WHAT, oletetaan laskuttamaton\x1b[0m\n"
        );
    }

    #[test]
    fn empty_report_prints_nothing() {
        let options = RenderOptions {
            language: Language::En,
            show_diff: false,
            color: false,
        };
        let (output, diag) = render_to_strings(&[], &options);
        assert!(output.is_empty());
        assert!(diag.is_empty());
    }
}
