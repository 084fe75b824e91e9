//! Error types for the taskpad core library

use thiserror::Error;

/// Result type alias for taskpad operations
pub type Result<T> = std::result::Result<T, TaskpadError>;

/// Main error type for taskpad operations
#[derive(Error, Debug)]
pub enum TaskpadError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {id}")]
    TaskNotFound { id: i64 },

    #[error("Tasks not found: {}", format_ids(.ids))]
    TasksNotFound { ids: Vec<i64> },

    #[error("Category not found: {id}")]
    CategoryNotFound { id: i64 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TaskpadError {
    /// Create a database error with context
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for the not-found family of errors (maps to HTTP 404 in shells)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound { .. } | Self::TasksNotFound { .. } | Self::CategoryNotFound { .. }
        )
    }

    /// True for validation errors (maps to HTTP 400 in shells)
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
