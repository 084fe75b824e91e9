//! Shared test fixtures, gated behind the `test-utils` feature

use crate::database::TaskpadDatabase;
use crate::error::Result;
use crate::models::{CreateCategoryRequest, CreateTaskRequest, PriorityInput};
use tempfile::NamedTempFile;

/// Create a file-backed test database
///
/// The returned temp file handle must stay alive for the lifetime of the
/// database; dropping it unlinks the file.
///
/// # Errors
///
/// Returns an error if the temp file or connection cannot be created
pub async fn create_test_database() -> Result<(NamedTempFile, TaskpadDatabase)> {
    let temp_file = NamedTempFile::new()?;
    let db = TaskpadDatabase::new(temp_file.path()).await?;
    Ok((temp_file, db))
}

/// Insert a task with the given title and default fields, returning its id
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn seed_task(db: &TaskpadDatabase, title: &str) -> Result<i64> {
    db.create_task(&CreateTaskRequest {
        title: title.to_string(),
        ..Default::default()
    })
    .await
}

/// Insert a task with an explicit priority, returning its id
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn seed_task_with_priority(
    db: &TaskpadDatabase,
    title: &str,
    priority: i64,
) -> Result<i64> {
    db.create_task(&CreateTaskRequest {
        title: title.to_string(),
        description: None,
        priority: Some(PriorityInput::Int(priority)),
    })
    .await
}

/// Insert `count` tasks titled `Task 1` through `Task {count}`
///
/// # Errors
///
/// Returns an error if any insert fails
pub async fn seed_tasks(db: &TaskpadDatabase, count: usize) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(count);
    for i in 1..=count {
        ids.push(seed_task(db, &format!("Task {i}")).await?);
    }
    Ok(ids)
}

/// Insert a category, returning its id
///
/// # Errors
///
/// Returns an error if the insert fails
pub async fn seed_category(db: &TaskpadDatabase, name: &str, color: &str) -> Result<i64> {
    let category = db
        .create_category(&CreateCategoryRequest {
            name: name.to_string(),
            color: color.to_string(),
        })
        .await?;
    Ok(category.id)
}
