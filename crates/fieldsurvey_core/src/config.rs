//! Runtime configuration for a survey session.
//!
//! # Responsibility
//! - Hold logging, storage and sync knobs in one serde-backed struct.
//! - Load overrides from a camelCase JSON file.
//!
//! # Invariants
//! - `sync_max_attempts >= 1`.
//! - `surveyor_name` is non-blank.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Browser local storage typically allows ~5 MiB per origin.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_SYNC_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_SURVEYOR_NAME: &str = "Field Agent";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurveyConfig {
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// SQLite file backing local storage; in-memory when unset.
    pub database_path: Option<PathBuf>,
    /// Stamped into `surveyedBy` for captured households.
    pub surveyor_name: String,
    /// Upper bound on reconciliation attempts per sync pass.
    pub sync_max_attempts: u32,
    /// Maximum serialized blob size; `None` disables the check.
    pub storage_quota_bytes: Option<usize>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            database_path: None,
            surveyor_name: DEFAULT_SURVEYOR_NAME.to_string(),
            sync_max_attempts: DEFAULT_SYNC_MAX_ATTEMPTS,
            storage_quota_bytes: Some(DEFAULT_STORAGE_QUOTA_BYTES),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl SurveyConfig {
    /// Reads a JSON config file; absent keys fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync_max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "syncMaxAttempts must be at least 1".to_string(),
            ));
        }
        if self.surveyor_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "surveyorName cannot be blank".to_string(),
            ));
        }
        if self.storage_quota_bytes == Some(0) {
            return Err(ConfigError::Invalid(
                "storageQuotaBytes must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SurveyConfig, DEFAULT_SYNC_MAX_ATTEMPTS};
    use std::path::PathBuf;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SurveyConfig::from_json_str(r#"{ "surveyorName": "Agent 7" }"#).unwrap();
        assert_eq!(config.surveyor_name, "Agent 7");
        assert_eq!(config.sync_max_attempts, DEFAULT_SYNC_MAX_ATTEMPTS);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn reads_paths_from_camel_case_keys() {
        let config = SurveyConfig::from_json_str(
            r#"{ "databasePath": "/var/lib/survey.db", "syncMaxAttempts": 5, "storageQuotaBytes": null }"#,
        )
        .unwrap();
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/survey.db"))
        );
        assert_eq!(config.sync_max_attempts, 5);
        assert_eq!(config.storage_quota_bytes, None);
    }

    #[test]
    fn rejects_zero_attempts_and_blank_surveyor() {
        let err = SurveyConfig::from_json_str(r#"{ "syncMaxAttempts": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SurveyConfig::from_json_str(r#"{ "surveyorName": "  " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = SurveyConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
