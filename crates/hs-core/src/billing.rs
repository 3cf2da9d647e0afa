//! Project registry and hour-code billability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hour-code the remote service uses for absences. Never billable.
pub const ABSENCE_CODE: &str = "poissa";

/// Separates the project key from the rest of an hour-code.
const PROJECT_SEPARATOR: char = '-';

/// Registry loading errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid project registry: {0}")]
    Json(#[from] serde_json::Error),
}

/// A `{name, billable}` pair as stored in `projects.json` and served by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub billable: bool,
}

#[derive(Debug, Deserialize)]
struct ProjectsFile {
    projects: Vec<ProjectEntry>,
}

/// Result of classifying one hour-code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Billability {
    Billable,
    NonBillable,
    /// The code's project is not in the registry; treated as non-billable.
    Unknown { project: String },
}

impl Billability {
    pub const fn is_billable(&self) -> bool {
        matches!(self, Self::Billable)
    }
}

/// Project key → billable flag, read-only for the run.
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: HashMap<String, bool>,
}

impl ProjectRegistry {
    pub fn new(entries: impl IntoIterator<Item = ProjectEntry>) -> Self {
        Self {
            projects: entries
                .into_iter()
                .map(|entry| (entry.name, entry.billable))
                .collect(),
        }
    }

    /// Parses a `{"projects": [{"name": .., "billable": ..}]}` document.
    pub fn from_json(text: &str) -> Result<Self, RegistryError> {
        let file: ProjectsFile = serde_json::from_str(text)?;
        Ok(Self::new(file.projects))
    }

    /// Forces the absence code to non-billable, overriding the registry.
    #[must_use]
    pub fn with_absence_code(mut self) -> Self {
        self.projects.insert(ABSENCE_CODE.to_string(), false);
        self
    }

    /// Project key of an hour-code: everything before the first `-`.
    pub fn project_of(code: &str) -> &str {
        code.split(PROJECT_SEPARATOR).next().unwrap_or(code)
    }

    /// Classifies the code. Unknown projects are reported by the caller.
    pub fn classify(&self, code: &str) -> Billability {
        let project = Self::project_of(code);
        match self.projects.get(project) {
            Some(true) => Billability::Billable,
            Some(false) => Billability::NonBillable,
            None => {
                tracing::debug!(project, code, "unknown project, assuming non-billable");
                Billability::Unknown {
                    project: project.to_string(),
                }
            }
        }
    }

    pub fn is_billable(&self, code: &str) -> bool {
        self.classify(code).is_billable()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
