//! Database layer: connection pool, queries, and transactional operations

mod core;
mod mappers;
mod query_builders;
mod validators;

pub use core::{DatabasePoolConfig, SqliteOptimizations, TaskpadDatabase};
pub use query_builders::{TaskListQueryBuilder, TaskUpdateBuilder};
pub use validators::{ensure_category_exists, ensure_task_active};
