//! Entity existence checks for database operations
//!
//! Operations that reference a task or category verify the target exists
//! (and, for tasks, is active) before touching any rows.

use crate::error::{Result, TaskpadError};
use sqlx::SqlitePool;
use tracing::instrument;

/// Ensure a task exists and has not been soft-deleted
///
/// # Errors
///
/// Returns `TaskNotFound` when the task is absent or soft-deleted, or a
/// database error when the query fails.
#[instrument(skip(pool))]
pub async fn ensure_task_active(pool: &SqlitePool, id: i64) -> Result<()> {
    let exists = sqlx::query("SELECT 1 FROM todos WHERE id = ? AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| TaskpadError::database(format!("Failed to check task {id}: {e}")))?
        .is_some();

    if !exists {
        return Err(TaskpadError::TaskNotFound { id });
    }
    Ok(())
}

/// Ensure a category exists
///
/// # Errors
///
/// Returns `CategoryNotFound` when the category is absent, or a database
/// error when the query fails.
#[instrument(skip(pool))]
pub async fn ensure_category_exists(pool: &SqlitePool, id: i64) -> Result<()> {
    let exists = sqlx::query("SELECT 1 FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| TaskpadError::database(format!("Failed to check category {id}: {e}")))?
        .is_some();

    if !exists {
        return Err(TaskpadError::CategoryNotFound { id });
    }
    Ok(())
}
