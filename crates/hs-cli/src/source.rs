//! Reader for the local hours directory.
//!
//! ```text
//! <hours_dir>/holidays.txt
//! <hours_dir>/projects.json
//! <hours_dir>/YYYY_MM/<name>.txt
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use hs_core::{HolidayRecord, LogEntry, ProjectRegistry, parse_holidays, parse_log};
use regex::Regex;

/// Month directory names, e.g. `2024_01`.
static MONTH_DIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}_\d{2}$").unwrap());

/// Log file names inside a month directory.
static LOG_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+\.txt$").unwrap());

const HOLIDAYS_FILE: &str = "holidays.txt";
const PROJECTS_FILE: &str = "projects.json";

/// The on-disk hours directory.
#[derive(Debug, Clone)]
pub struct HoursDir {
    root: PathBuf,
}

impl HoursDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// One log file per month directory, months in ascending order.
    pub fn month_logs(&self) -> Result<Vec<PathBuf>> {
        let months = sorted_names(&self.root, |name, path| {
            MONTH_DIR_RE.is_match(name) && path.is_dir()
        })
        .with_context(|| format!("failed to list {}", self.root.display()))?;

        let mut logs = Vec::new();
        for month in months {
            let dir = self.root.join(&month);
            let files = sorted_names(&dir, |name, path| LOG_FILE_RE.is_match(name) && path.is_file())
                .with_context(|| format!("failed to list {}", dir.display()))?;
            match files.into_iter().next() {
                Some(file) => logs.push(dir.join(file)),
                None => tracing::warn!(dir = %dir.display(), "month directory has no log file"),
            }
        }
        Ok(logs)
    }

    /// Every entry from every month log.
    pub fn read_entries(&self) -> Result<Vec<LogEntry>> {
        let mut entries = Vec::new();
        for path in self.month_logs()? {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let parsed = parse_log(&text).with_context(|| format!("invalid log {}", path.display()))?;
            tracing::debug!(path = %path.display(), entries = parsed.len(), "read hour log");
            entries.extend(parsed);
        }
        Ok(entries)
    }

    /// Holiday records; an absent holiday file yields none.
    pub fn read_holidays(&self) -> Result<Vec<HolidayRecord>> {
        let path = self.root.join(HOLIDAYS_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "no holiday file, counting no holidays");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        parse_holidays(&text).with_context(|| format!("invalid holiday file {}", path.display()))
    }

    pub fn read_registry(&self) -> Result<ProjectRegistry> {
        let path = self.root.join(PROJECTS_FILE);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let registry = ProjectRegistry::from_json(&text)
            .with_context(|| format!("invalid project file {}", path.display()))?;
        tracing::debug!(projects = registry.len(), "loaded project registry");
        Ok(registry)
    }
}

/// Names of the directory's entries accepted by `keep`, sorted.
fn sorted_names(dir: &Path, keep: impl Fn(&str, &Path) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if keep(&name, &entry.path()) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn month_logs_pick_first_log_per_month_in_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "2024_02/work.txt", "");
        write(temp.path(), "2024_01/b.txt", "");
        write(temp.path(), "2024_01/a.txt", "");
        write(temp.path(), "2024_01/Notes.txt", "");
        write(temp.path(), "archive/x.txt", "");
        write(temp.path(), "2024_03/readme.md", "");

        let logs = HoursDir::new(temp.path()).month_logs().unwrap();
        assert_eq!(
            logs,
            vec![
                temp.path().join("2024_01/a.txt"),
                temp.path().join("2024_02/work.txt"),
            ]
        );
    }

    #[test]
    fn read_entries_spans_months() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "2024_01/log.txt", "05.01.2024\t7.5\tPROJA-100\t\n");
        write(
            temp.path(),
            "2024_02/log.txt",
            "# comment\n2024-02-01\t1\t08:00\t10:00\t2\tPROJB-1\n",
        );

        let entries = HoursDir::new(temp.path()).read_entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].code, "PROJB-1");
    }

    #[test]
    fn malformed_log_names_the_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "2024_01/log.txt", "not-a-date\t1\tX-1\n");

        let err = HoursDir::new(temp.path()).read_entries().unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("log.txt"), "{message}");
        assert!(message.contains("line 1"), "{message}");
    }

    #[test]
    fn missing_holiday_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let holidays = HoursDir::new(temp.path()).read_holidays().unwrap();
        assert!(holidays.is_empty());
    }

    #[test]
    fn missing_project_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = HoursDir::new(temp.path()).read_registry().unwrap_err();
        assert!(format!("{err:#}").contains("projects.json"));
    }

    #[test]
    fn registry_reads_projects_file() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "projects.json",
            r#"{"projects":[{"name":"PROJA","billable":true}]}"#,
        );
        let registry = HoursDir::new(temp.path()).read_registry().unwrap();
        assert!(registry.is_billable("PROJA-1"));
    }
}
