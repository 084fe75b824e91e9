//! Taskpad Core - SQLite-backed task tracking
//!
//! This library provides async access to a task store with soft delete,
//! categories (many-to-many), filtered and paginated listing, substring
//! search, and all-or-nothing batch operations.
//!
//! # Quick Start
//!
//! ```no_run
//! use taskpad_core::{CreateTaskRequest, TaskListParams, TaskpadDatabase};
//! use std::path::Path;
//!
//! # async fn example() -> taskpad_core::Result<()> {
//! let db = TaskpadDatabase::new(Path::new("taskpad.db")).await?;
//!
//! let id = db
//!     .create_task(&CreateTaskRequest {
//!         title: "Buy milk".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let page = db.list_tasks(&TaskListParams::default()).await?;
//! println!("{} tasks, created #{id}", page.items.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: shared test fixtures (for testing only)

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::TaskpadConfig;
pub use database::{DatabasePoolConfig, SqliteOptimizations, TaskpadDatabase};
pub use error::{Result, TaskpadError};
pub use models::{
    BoolInput, Category, CreateCategoryRequest, CreateTaskRequest, DatabaseStats, Page, PageInfo,
    Priority, PriorityInput, SortField, SortOrder, Task, TaskListParams, UpdateTaskRequest,
};

/// Re-export commonly used types
pub use chrono::{DateTime, Utc};
