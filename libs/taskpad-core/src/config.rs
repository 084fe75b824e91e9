//! Configuration for taskpad database access

#[cfg(any(test, feature = "test-utils"))]
use crate::error::Result;
use std::path::{Path, PathBuf};
use taskpad_common::{default_database_path, DATABASE_PATH_ENV};

/// Environment variable toggling database creation
const CREATE_IF_MISSING_ENV: &str = "TASKPAD_CREATE_IF_MISSING";

/// Configuration for taskpad database access
#[derive(Debug, Clone)]
pub struct TaskpadConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,
    /// Whether to create the database file when it does not exist
    pub create_if_missing: bool,
}

impl TaskpadConfig {
    /// Create a configuration with a custom database path
    #[must_use]
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            create_if_missing: true,
        }
    }

    /// Disable creating the database file when it does not exist
    #[must_use]
    pub fn without_create(mut self) -> Self {
        self.create_if_missing = false;
        self
    }

    /// Create configuration from environment variables
    ///
    /// Reads `TASKPAD_DB_PATH` (falling back to `taskpad.db` in the current
    /// directory) and `TASKPAD_CREATE_IF_MISSING` (true/1/yes/on enable,
    /// case-insensitively; anything else disables).
    #[must_use]
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_ENV)
            .map_or_else(|_| default_database_path(), PathBuf::from);

        let create_if_missing = std::env::var(CREATE_IF_MISSING_ENV)
            .map(|v| {
                matches!(
                    v.to_lowercase().as_str(),
                    "true" | "1" | "yes" | "on"
                )
            })
            .unwrap_or(true);

        Self {
            database_path,
            create_if_missing,
        }
    }

    /// Create configuration for testing with a temporary database file
    ///
    /// # Errors
    ///
    /// Returns an IO error if the temporary file cannot be created
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing() -> Result<(tempfile::NamedTempFile, Self)> {
        let temp_file = tempfile::NamedTempFile::new()?;
        let config = Self::new(temp_file.path());
        Ok((temp_file, config))
    }
}

impl Default for TaskpadConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            create_if_missing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TaskpadConfig::new("/path/to/tasks.db");
        assert_eq!(config.database_path, PathBuf::from("/path/to/tasks.db"));
        assert!(config.create_if_missing);
    }

    #[test]
    fn test_without_create() {
        let config = TaskpadConfig::new("/path/to/tasks.db").without_create();
        assert!(!config.create_if_missing);
    }

    #[test]
    fn test_default_config() {
        let config = TaskpadConfig::default();
        assert_eq!(config.database_path, PathBuf::from("taskpad.db"));
        assert!(config.create_if_missing);
    }

    #[test]
    fn test_create_if_missing_parsing() {
        let test_cases = vec![
            ("true", true),
            ("TRUE", true),
            ("1", true),
            ("yes", true),
            ("on", true),
            ("false", false),
            ("0", false),
            ("off", false),
            ("invalid", false),
            ("", false),
        ];

        for (value, expected) in test_cases {
            let result = matches!(
                value.to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            );
            assert_eq!(result, expected, "Failed for value: '{value}'");
        }
    }

    #[test]
    fn test_for_testing() {
        let (temp_file, config) = TaskpadConfig::for_testing().unwrap();
        assert_eq!(config.database_path, temp_file.path());
        assert!(config.create_if_missing);
        assert!(config.database_path.parent().is_some());
    }

    #[test]
    fn test_config_clone_and_debug() {
        let config = TaskpadConfig::new("/test/path");
        let cloned = config.clone();
        assert_eq!(config.database_path, cloned.database_path);

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("database_path"));
        assert!(debug_str.contains("/test/path"));
    }
}
