//! Row-to-model mapping helpers
//!
//! Timestamps are stored as SQLite `CURRENT_TIMESTAMP` text and parsed back
//! here; the completed flag is stored as 0/1 and round-tripped to `bool`.

use crate::error::{Result, TaskpadError};
use crate::models::{Category, Priority, Task};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Parse a stored timestamp (`YYYY-MM-DD HH:MM:SS`, with optional fractional
/// seconds or RFC 3339)
pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    Err(TaskpadError::database(format!(
        "unparseable timestamp in database: {text}"
    )))
}

/// Map a `todos` row (selected with [`super::query_builders::TASK_COLUMNS`])
/// to a `Task` with an empty category list
pub(crate) fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let priority_raw: i64 = row.get("priority");
    let priority = Priority::from_i64(priority_raw).ok_or_else(|| {
        TaskpadError::database(format!("invalid priority in database: {priority_raw}"))
    })?;

    let created_at = parse_timestamp(&row.get::<String, _>("created_at"))?;
    let updated_at = parse_timestamp(&row.get::<String, _>("updated_at"))?;
    let deleted_at = row
        .get::<Option<String>, _>("deleted_at")
        .map(|text| parse_timestamp(&text))
        .transpose()?;

    Ok(Task {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: row.get::<i64, _>("completed") != 0,
        priority,
        created_at,
        updated_at,
        deleted_at,
        categories: Vec::new(),
    })
}

/// Map a `categories` row to a `Category`
pub(crate) fn row_to_category(row: &SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_sqlite_format() {
        let dt = parse_timestamp("2024-03-15 09:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-15T09:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let dt = parse_timestamp("2024-03-15 09:30:00.123").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2024-03-15T09:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-15T07:30:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("not a timestamp").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
