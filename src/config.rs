use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::collection::ValidateOptions;
use crate::errors::DocError;

/// Settings file name looked up in the working directory.
pub const CONFIG_FILE: &str = "docguard.toml";

/// Process-wide defaults for validation policy and logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    pub enforce_checks: Option<bool>,
    pub warn_on_wrong_data: Option<bool>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_retention: Option<usize>,
}

impl GuardConfig {
    /// # Errors
    /// `Config` when the text is not valid TOML for this structure.
    pub fn from_toml(s: &str) -> Result<Self, DocError> {
        toml::from_str(s).map_err(|e| DocError::Config(e.to_string()))
    }

    /// # Errors
    /// `Io` when the file cannot be read, `Config` when it cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, DocError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Fill every unset field from `other`.
    pub fn merge_missing(&mut self, other: Self) {
        if self.enforce_checks.is_none() {
            self.enforce_checks = other.enforce_checks;
        }
        if self.warn_on_wrong_data.is_none() {
            self.warn_on_wrong_data = other.warn_on_wrong_data;
        }
        if self.log_dir.is_none() {
            self.log_dir = other.log_dir;
        }
        if self.log_level.is_none() {
            self.log_level = other.log_level;
        }
        if self.log_retention.is_none() {
            self.log_retention = other.log_retention;
        }
    }

    /// Fill unset fields from variables supplied by `lookup`.
    pub fn merge_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| {
            lookup(name).map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        };
        self.merge_missing(Self {
            enforce_checks: flag("DOCGUARD_ENFORCE_CHECKS"),
            warn_on_wrong_data: flag("DOCGUARD_WARN_ON_WRONG_DATA"),
            log_dir: lookup("DOCGUARD_LOG_DIR").map(PathBuf::from),
            log_level: lookup("DOCGUARD_LOG_LEVEL"),
            log_retention: lookup("DOCGUARD_LOG_RETENTION").and_then(|s| s.parse().ok()),
        });
    }

    #[must_use]
    pub const fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            enforce_checks: self.enforce_checks,
            warn_on_wrong_data: self.warn_on_wrong_data,
        }
    }

    /// Install the logging configuration these settings describe.
    ///
    /// # Errors
    /// As [`crate::logger::configure_logging`].
    pub fn configure_logging(&self) -> Result<(), Box<dyn std::error::Error>> {
        crate::logger::configure_logging(
            self.log_dir.as_deref(),
            self.log_level.as_deref(),
            self.log_retention,
        )
    }
}

fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    if let Ok(p) = std::env::var("DOCGUARD_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join(CONFIG_FILE));
    }
    paths
}

/// Load settings. Precedence: `explicit` file > `DOCGUARD_CONFIG` file >
/// `./docguard.toml` > environment variables > defaults.
///
/// Files that exist but cannot be parsed are skipped with a warning.
#[must_use]
pub fn load_config(explicit: Option<&Path>) -> GuardConfig {
    let mut cfg = GuardConfig::default();
    for path in config_paths(explicit) {
        if !path.exists() {
            continue;
        }
        match GuardConfig::from_file(&path) {
            Ok(file_cfg) => cfg.merge_missing(file_cfg),
            Err(e) => log::warn!("ignoring config {}: {e}", path.display()),
        }
    }
    cfg.merge_env(|name| std::env::var(name).ok());
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parses_toml() {
        let cfg = GuardConfig::from_toml(
            "enforce_checks = false\nlog_level = \"debug\"\nlog_retention = 3\n",
        )
        .unwrap();
        assert_eq!(cfg.enforce_checks, Some(false));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
        assert_eq!(cfg.log_retention, Some(3));
        assert_eq!(cfg.warn_on_wrong_data, None);
        assert!(matches!(GuardConfig::from_toml("enforce_checks = 3"), Err(DocError::Config(_))));
    }

    #[test]
    fn explicit_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guard.toml");
        std::fs::write(&path, "enforce_checks = false\nwarn_on_wrong_data = true\n").unwrap();
        let cfg = load_config(Some(&path));
        assert_eq!(cfg.enforce_checks, Some(false));
        assert_eq!(cfg.warn_on_wrong_data, Some(true));
        assert_eq!(
            cfg.validate_options(),
            ValidateOptions { enforce_checks: Some(false), warn_on_wrong_data: Some(true) }
        );
    }

    #[test]
    fn env_fills_only_unset_fields() {
        let vars: HashMap<&str, &str> = [
            ("DOCGUARD_ENFORCE_CHECKS", "yes"),
            ("DOCGUARD_WARN_ON_WRONG_DATA", "0"),
            ("DOCGUARD_LOG_RETENTION", "4"),
        ]
        .into_iter()
        .collect();
        let mut cfg = GuardConfig { enforce_checks: Some(false), ..GuardConfig::default() };
        cfg.merge_env(|k| vars.get(k).map(|v| (*v).to_string()));
        assert_eq!(cfg.enforce_checks, Some(false));
        assert_eq!(cfg.warn_on_wrong_data, Some(false));
        assert_eq!(cfg.log_retention, Some(4));
        assert_eq!(cfg.log_dir, None);
    }
}
