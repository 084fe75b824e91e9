//! Shared constants for taskpad crates

/// Default database filename used when no path is configured
pub const DATABASE_FILENAME: &str = "taskpad.db";

/// Environment variable naming the database path
pub const DATABASE_PATH_ENV: &str = "TASKPAD_DB_PATH";

/// Maximum allowed title length, in characters
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum allowed description length, in characters
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Page number used when pagination is requested without an explicit page
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when pagination is requested without an explicit limit
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Server-side cap on the page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Priority bounds (inclusive)
pub const PRIORITY_MIN: i64 = 1;
pub const PRIORITY_MAX: i64 = 3;
