//! Taskpad Common - shared constants and utilities
//!
//! This crate provides the constants and small helpers shared by the
//! taskpad core library and CLI.
//!
//! # Examples
//!
//! ```
//! use taskpad_common::{DATABASE_FILENAME, ceil_div, truncate_string};
//!
//! assert_eq!(DATABASE_FILENAME, "taskpad.db");
//! assert_eq!(ceil_div(25, 10), 3);
//! assert_eq!(truncate_string("hello world", 8), "hello...");
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_exported_constants() {
        assert_eq!(DATABASE_FILENAME, "taskpad.db");
        assert_eq!(DATABASE_PATH_ENV, "TASKPAD_DB_PATH");
        assert_eq!(DEFAULT_PAGE_SIZE, 10);
        assert_eq!(MAX_PAGE_SIZE, 100);
    }

    #[test]
    fn test_re_exported_functions() {
        let path = default_database_path();
        assert!(!path.to_string_lossy().is_empty());
        assert_eq!(ceil_div(21, 10), 3);
    }
}
