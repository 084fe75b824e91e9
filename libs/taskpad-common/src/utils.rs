//! Small shared utilities for taskpad crates

use crate::constants::DATABASE_FILENAME;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Get the default database path (`taskpad.db` in the current directory)
#[must_use]
pub fn default_database_path() -> PathBuf {
    PathBuf::from(DATABASE_FILENAME)
}

/// Format a UTC timestamp for display
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate a string to `max_len` characters, appending `...` when cut
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let truncated: String = s.chars().take(keep).collect();
    format!("{truncated}...")
}

/// Ceiling division for pagination math (`total_pages = ceil(total / limit)`)
#[must_use]
pub fn ceil_div(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
