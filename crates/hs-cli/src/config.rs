//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::locale::Language;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `holidays.txt`, `projects.json` and `YYYY_MM` log directories.
    pub hours_dir: PathBuf,
    /// Report language.
    pub language: Language,
    /// Fixed working-day length; inferred per year from holidays when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_per_day: Option<f64>,
    /// Remote time-tracking server, with or without scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Session cookie for the remote server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hours_dir", &self.hours_dir)
            .field("language", &self.language)
            .field("hours_per_day", &self.hours_per_day)
            .field("server", &self.server)
            .field("session", &self.session.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hours_dir: default_hours_dir().unwrap_or_else(|| PathBuf::from(".hours")),
            language: Language::default(),
            hours_per_day: None,
            server: None,
            session: None,
        }
    }
}

/// Values threaded into report building and rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub language: Language,
    pub hours_per_day: Option<f64>,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (HOURS_STAT_*)
        figment = figment.merge(Env::prefixed("HOURS_STAT_"));

        figment.extract()
    }

    /// Applies command-line flags on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, language: Option<Language>, hours_per_day: Option<f64>) -> Self {
        if let Some(language) = language {
            self.language = language;
        }
        if hours_per_day.is_some() {
            self.hours_per_day = hours_per_day;
        }
        self
    }

    /// Applies `web` subcommand flags on top of the loaded values.
    #[must_use]
    pub fn with_remote(mut self, server: Option<String>, session: Option<String>) -> Self {
        if server.is_some() {
            self.server = server;
        }
        if session.is_some() {
            self.session = session;
        }
        self
    }

    pub const fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            language: self.language,
            hours_per_day: self.hours_per_day,
        }
    }
}

/// Returns the platform-specific config directory for hours-stat.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hours-stat"))
}

/// Returns the default hours directory, `~/.hours`.
pub fn default_hours_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".hours"))
}
