//! SQLx-based database layer for taskpad
//!
//! All operations run against a `SqlitePool`; batch operations and anything
//! needing atomicity use a single transaction, with rollback guaranteed on
//! every early exit by dropping the uncommitted transaction.

use crate::config::TaskpadConfig;
use crate::database::mappers::{row_to_category, row_to_task};
use crate::database::query_builders::{
    in_placeholders, TaskListQueryBuilder, TaskUpdateBuilder, TASK_COLUMNS,
};
use crate::database::validators::{ensure_category_exists, ensure_task_active};
use crate::error::{Result, TaskpadError};
use crate::models::{
    Category, CreateCategoryRequest, CreateTaskRequest, DatabaseStats, Page, PageInfo, Priority,
    PriorityInput, Task, TaskListParams, UpdateTaskRequest,
};
use crate::validation::{
    normalize_batch_ids, normalize_category_color, normalize_category_name, normalize_completed,
    normalize_description, normalize_pagination, normalize_priority, normalize_search_query,
    normalize_title, parse_sort_field, parse_sort_order, validate_id,
};
use serde::{Deserialize, Serialize};
use sqlx::pool::PoolOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Executor, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use taskpad_common::ceil_div;
use tracing::{debug, error, info, instrument};

/// Idempotent schema bootstrap, applied on every connect
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 200),
        description TEXT NOT NULL DEFAULT '' CHECK (length(description) <= 1000),
        completed INTEGER NOT NULL DEFAULT 0 CHECK (completed IN (0, 1)),
        priority INTEGER NOT NULL DEFAULT 2 CHECK (priority BETWEEN 1 AND 3),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        deleted_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        color TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS todos_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        todo_id INTEGER NOT NULL REFERENCES todos(id) ON DELETE CASCADE,
        category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
        UNIQUE (todo_id, category_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos(completed)",
    "CREATE INDEX IF NOT EXISTS idx_todos_priority ON todos(priority)",
    "CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_todos_deleted_at ON todos(deleted_at)",
];

/// Database connection pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabasePoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    pub min_connections: u32,
    /// Connection acquire timeout
    pub connect_timeout: Duration,
    /// Idle timeout for connections
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
    /// Test connections before use
    pub test_before_acquire: bool,
    /// SQLite-specific optimizations
    pub sqlite_optimizations: SqliteOptimizations,
}

/// SQLite-specific optimization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteOptimizations {
    /// Journal mode (WAL for better concurrency)
    pub journal_mode: String,
    /// Synchronous mode (NORMAL, FULL, OFF)
    pub synchronous_mode: String,
    /// Cache size in pages (negative = KB)
    pub cache_size: i32,
    /// Temp store (MEMORY, FILE, DEFAULT)
    pub temp_store: String,
    /// mmap size in bytes
    pub mmap_size: i64,
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
            test_before_acquire: true,
            sqlite_optimizations: SqliteOptimizations::default(),
        }
    }
}

impl Default for SqliteOptimizations {
    fn default() -> Self {
        Self {
            journal_mode: "WAL".to_string(),
            synchronous_mode: "NORMAL".to_string(),
            cache_size: -20000, // 20MB cache
            temp_store: "MEMORY".to_string(),
            mmap_size: 268_435_456, // 256MB
        }
    }
}

/// The effect applied by a batch operation, all-or-nothing
#[derive(Debug, Clone, Copy)]
enum BatchEffect {
    HardDelete,
    SoftDelete,
    Restore,
}

impl BatchEffect {
    fn statement(self, placeholders: &str) -> String {
        match self {
            BatchEffect::HardDelete => {
                format!("DELETE FROM todos WHERE id IN ({placeholders})")
            }
            BatchEffect::SoftDelete => format!(
                "UPDATE todos SET deleted_at = CURRENT_TIMESTAMP WHERE id IN ({placeholders})"
            ),
            BatchEffect::Restore => {
                format!("UPDATE todos SET deleted_at = NULL WHERE id IN ({placeholders})")
            }
        }
    }

    fn describe(self) -> &'static str {
        match self {
            BatchEffect::HardDelete => "hard delete",
            BatchEffect::SoftDelete => "soft delete",
            BatchEffect::Restore => "restore",
        }
    }
}

/// SQLx-based database for taskpad data
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TaskpadDatabase {
    pool: SqlitePool,
    config: DatabasePoolConfig,
}

impl TaskpadDatabase {
    /// Open (creating if missing) a database at the given path with the
    /// default pool configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema bootstrap fails
    #[instrument]
    pub async fn new(database_path: &Path) -> Result<Self> {
        Self::new_with_config(database_path, DatabasePoolConfig::default()).await
    }

    /// Open a database at the given path with a custom pool configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema bootstrap fails
    #[instrument]
    pub async fn new_with_config(
        database_path: &Path,
        config: DatabasePoolConfig,
    ) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true);
        Self::connect(options, config).await
    }

    /// Open a database using a `TaskpadConfig`
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist and `create_if_missing`
    /// is disabled, or if the connection fails
    #[instrument]
    pub async fn with_config(config: &TaskpadConfig) -> Result<Self> {
        if !config.create_if_missing && !config.database_path.exists() {
            return Err(TaskpadError::configuration(format!(
                "Database not found at {} and create_if_missing is disabled",
                config.database_path.display()
            )));
        }
        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(config.create_if_missing)
            .foreign_keys(true);
        Self::connect(options, DatabasePoolConfig::default()).await
    }

    /// Open a database from a connection string (e.g. `sqlite::memory:`)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema bootstrap fails
    #[instrument]
    pub async fn from_connection_string(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| TaskpadError::database(format!("Invalid connection string: {e}")))?
            .foreign_keys(true);
        Self::connect(options, DatabasePoolConfig::default()).await
    }

    async fn connect(options: SqliteConnectOptions, config: DatabasePoolConfig) -> Result<Self> {
        info!(
            "Connecting to SQLite database with {} max connections",
            config.max_connections
        );

        let pool = PoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .max_lifetime(Some(config.max_lifetime))
            .test_before_acquire(config.test_before_acquire)
            .connect_with(options)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to connect to database: {e}")))?;

        Self::apply_sqlite_optimizations(&pool, &config.sqlite_optimizations).await?;
        Self::ensure_schema(&pool).await?;

        info!("Database connection pool established successfully");
        Ok(Self { pool, config })
    }

    /// Apply SQLite pragmas for performance
    async fn apply_sqlite_optimizations(
        pool: &SqlitePool,
        optimizations: &SqliteOptimizations,
    ) -> Result<()> {
        sqlx::query(&format!(
            "PRAGMA journal_mode = {}",
            optimizations.journal_mode
        ))
        .execute(pool)
        .await
        .map_err(|e| TaskpadError::database(format!("Failed to set journal mode: {e}")))?;

        sqlx::query(&format!(
            "PRAGMA synchronous = {}",
            optimizations.synchronous_mode
        ))
        .execute(pool)
        .await
        .map_err(|e| TaskpadError::database(format!("Failed to set synchronous mode: {e}")))?;

        sqlx::query(&format!("PRAGMA cache_size = {}", optimizations.cache_size))
            .execute(pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to set cache size: {e}")))?;

        sqlx::query(&format!("PRAGMA temp_store = {}", optimizations.temp_store))
            .execute(pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to set temp store: {e}")))?;

        sqlx::query(&format!("PRAGMA mmap_size = {}", optimizations.mmap_size))
            .execute(pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to set mmap size: {e}")))?;

        debug!(
            "Applied SQLite optimizations: journal={}, sync={}, cache={}KB, temp={}, mmap={}MB",
            optimizations.journal_mode,
            optimizations.synchronous_mode,
            optimizations.cache_size.abs() / 1024,
            optimizations.temp_store,
            optimizations.mmap_size / 1024 / 1024
        );

        Ok(())
    }

    /// Create the schema if it does not exist yet
    async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| TaskpadError::database(format!("Failed to apply schema: {e}")))?;
        }
        debug!("Schema bootstrap complete");
        Ok(())
    }

    /// Get the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// The pool configuration this database was opened with
    #[must_use]
    pub fn pool_config(&self) -> &DatabasePoolConfig {
        &self.config
    }

    /// Check if the database is reachable
    #[instrument(skip(self))]
    pub async fn is_connected(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                debug!("Database connection is healthy");
                true
            }
            Err(e) => {
                error!("Database connection check failed: {}", e);
                false
            }
        }
    }

    /// Get row counts for the health check
    ///
    /// # Errors
    ///
    /// Returns an error if any count query fails
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<DatabaseStats> {
        let active_tasks: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| TaskpadError::database(format!("Failed to count tasks: {e}")))?;

        let completed_tasks: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM todos WHERE deleted_at IS NULL AND completed = 1",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskpadError::database(format!("Failed to count completed tasks: {e}")))?;

        let deleted_tasks: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE deleted_at IS NOT NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| TaskpadError::database(format!("Failed to count deleted tasks: {e}")))?;

        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to count categories: {e}")))?;

        Ok(DatabaseStats {
            active_tasks: active_tasks.max(0) as u64,
            completed_tasks: completed_tasks.max(0) as u64,
            deleted_tasks: deleted_tasks.max(0) as u64,
            categories: categories.max(0) as u64,
        })
    }

    /// List active tasks with optional filters, sorting, and pagination
    ///
    /// Supplying either `page` or `limit` activates pagination and the
    /// result carries a `PageInfo` computed from a count query sharing the
    /// data query's join shape. Without pagination the full filtered set is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range priority or an
    /// unrecognized completed value, or a database error if a query fails
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, params: &TaskListParams) -> Result<Page<Task>> {
        let completed = params
            .completed
            .as_ref()
            .map(normalize_completed)
            .transpose()?;
        let priority = params
            .priority
            .as_ref()
            .map(normalize_priority)
            .transpose()?;
        if let Some(category_id) = params.category_id {
            validate_id(category_id, "category")?;
        }

        let mut builder = TaskListQueryBuilder::new().order_by(
            parse_sort_field(params.sort_by.as_deref()),
            parse_sort_order(params.sort_order.as_deref()),
        );
        if params.category_id.is_some() {
            builder = builder.with_category_filter();
        }
        if let Some(completed) = completed {
            builder = builder.completed(completed);
        }
        if let Some(priority) = priority {
            builder = builder.priority(priority);
        }

        let page_slice = if params.wants_pagination() {
            builder = builder.paginated();
            Some(normalize_pagination(params.page, params.limit))
        } else {
            None
        };

        let data_sql = builder.data_query();
        let mut query = sqlx::query(&data_sql);
        if let Some(category_id) = params.category_id {
            query = query.bind(category_id);
        }
        if let Some(completed) = completed {
            query = query.bind(i64::from(completed));
        }
        if let Some(priority) = priority {
            query = query.bind(priority.as_i64());
        }
        if let Some((page, limit)) = page_slice {
            query = query.bind(limit).bind((page - 1) * limit);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to list tasks: {e}")))?;
        let mut tasks = rows.iter().map(row_to_task).collect::<Result<Vec<_>>>()?;
        self.attach_categories(&mut tasks).await?;
        debug!("Fetched {} tasks", tasks.len());

        let pagination = match page_slice {
            Some((page, limit)) => {
                let count_sql = builder.count_query();
                let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
                if let Some(category_id) = params.category_id {
                    count_query = count_query.bind(category_id);
                }
                if let Some(completed) = completed {
                    count_query = count_query.bind(i64::from(completed));
                }
                if let Some(priority) = priority {
                    count_query = count_query.bind(priority.as_i64());
                }
                let total = count_query
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| TaskpadError::database(format!("Failed to count tasks: {e}")))?;

                Some(PageInfo {
                    page,
                    limit,
                    total,
                    total_pages: ceil_div(total, limit),
                })
            }
            None => None,
        };

        Ok(Page {
            items: tasks,
            pagination,
        })
    }

    /// List soft-deleted tasks, newest first, with the same pagination
    /// contract as `list_tasks`
    ///
    /// # Errors
    ///
    /// Returns a database error if a query fails
    #[instrument(skip(self))]
    pub async fn list_deleted_tasks(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<Task>> {
        let wants_pagination = page.is_some() || limit.is_some();
        let mut sql = format!(
            "SELECT {TASK_COLUMNS} FROM todos t WHERE t.deleted_at IS NOT NULL ORDER BY t.created_at DESC, t.id DESC"
        );

        let page_slice = if wants_pagination {
            sql.push_str(" LIMIT ? OFFSET ?");
            Some(normalize_pagination(page, limit))
        } else {
            None
        };

        let mut query = sqlx::query(&sql);
        if let Some((page, limit)) = page_slice {
            query = query.bind(limit).bind((page - 1) * limit);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to list deleted tasks: {e}")))?;
        let mut tasks = rows.iter().map(row_to_task).collect::<Result<Vec<_>>>()?;
        self.attach_categories(&mut tasks).await?;

        let pagination = match page_slice {
            Some((page, limit)) => {
                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE deleted_at IS NOT NULL")
                        .fetch_one(&self.pool)
                        .await
                        .map_err(|e| {
                            TaskpadError::database(format!("Failed to count deleted tasks: {e}"))
                        })?;
                Some(PageInfo {
                    page,
                    limit,
                    total,
                    total_pages: ceil_div(total, limit),
                })
            }
            None => None,
        };

        Ok(Page {
            items: tasks,
            pagination,
        })
    }

    /// Get one active task with its categories
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` when the task is absent or soft-deleted
    #[instrument(skip(self))]
    pub async fn get_task(&self, id: i64) -> Result<Task> {
        validate_id(id, "task")?;

        let sql =
            format!("SELECT {TASK_COLUMNS} FROM todos t WHERE t.id = ? AND t.deleted_at IS NULL");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to fetch task {id}: {e}")))?
            .ok_or(TaskpadError::TaskNotFound { id })?;

        let mut task = row_to_task(&row)?;
        self.attach_categories(std::slice::from_mut(&mut task)).await?;
        Ok(task)
    }

    /// Create a task and return its new id
    ///
    /// The store assigns `created_at` and `updated_at`; the task starts
    /// active and incomplete.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad title, description, or priority
    #[instrument(skip(self))]
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<i64> {
        let title = normalize_title(&request.title)?;
        let description = normalize_description(request.description.as_deref())?;
        let priority = match &request.priority {
            None => Priority::default(),
            // An empty priority string means "use the default", same as absent
            Some(PriorityInput::Text(text)) if text.trim().is_empty() => Priority::default(),
            Some(input) => normalize_priority(input)?,
        };

        let result = sqlx::query("INSERT INTO todos (title, description, priority) VALUES (?, ?, ?)")
            .bind(&title)
            .bind(&description)
            .bind(priority.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to create task: {e}")))?;

        let id = result.last_insert_rowid();
        info!("Created task {}", id);
        Ok(id)
    }

    /// Apply a partial update to an active task and return the updated task
    ///
    /// Only supplied fields are validated and written. An empty request
    /// returns the task unchanged without touching `updated_at`; any real
    /// update bumps it.
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` when the task is absent or soft-deleted, or a
    /// validation error for a bad field value
    #[instrument(skip(self))]
    pub async fn update_task(&self, id: i64, request: &UpdateTaskRequest) -> Result<Task> {
        validate_id(id, "task")?;

        // Validate everything before the existence check so malformed input
        // never reaches the storage layer.
        let title = request.title.as_deref().map(normalize_title).transpose()?;
        let description = request
            .description
            .as_deref()
            .map(|d| normalize_description(Some(d)))
            .transpose()?;
        let completed = request
            .completed
            .as_ref()
            .map(normalize_completed)
            .transpose()?;
        let priority = request
            .priority
            .as_ref()
            .map(normalize_priority)
            .transpose()?;

        ensure_task_active(&self.pool, id).await?;

        if request.is_empty() {
            return self.get_task(id).await;
        }

        let builder = TaskUpdateBuilder::from_request(request);
        let query_string = builder.build_query_string();
        let mut query = sqlx::query(&query_string);

        // Bind in the same order the builder added fields
        if let Some(title) = &title {
            query = query.bind(title);
        }
        if let Some(description) = &description {
            query = query.bind(description);
        }
        if let Some(completed) = completed {
            query = query.bind(i64::from(completed));
        }
        if let Some(priority) = priority {
            query = query.bind(priority.as_i64());
        }
        query = query.bind(id);

        query
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to update task {id}: {e}")))?;

        info!("Updated task {} ({} fields)", id, builder.len());
        self.get_task(id).await
    }

    /// Hard-delete one active task, returning the pre-deletion snapshot
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` when the task is absent or soft-deleted
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: i64) -> Result<Task> {
        let snapshot = self.get_task(id).await?;

        sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to delete task {id}: {e}")))?;

        info!("Hard-deleted task {}", id);
        Ok(snapshot)
    }

    /// Batch hard-delete, all-or-nothing
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad id list, or `TasksNotFound`
    /// naming every missing id; no rows are touched on failure
    #[instrument(skip(self))]
    pub async fn batch_delete_tasks(&self, ids: &[i64]) -> Result<Vec<Task>> {
        self.batch_apply(ids, BatchEffect::HardDelete).await
    }

    /// Batch soft-delete, all-or-nothing
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad id list, or `TasksNotFound`
    /// naming every missing id; no rows are touched on failure
    #[instrument(skip(self))]
    pub async fn batch_soft_delete_tasks(&self, ids: &[i64]) -> Result<Vec<Task>> {
        self.batch_apply(ids, BatchEffect::SoftDelete).await
    }

    /// Batch restore of soft-deleted tasks, all-or-nothing
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad id list, or `TasksNotFound`
    /// naming every missing id; no rows are touched on failure
    #[instrument(skip(self))]
    pub async fn batch_restore_tasks(&self, ids: &[i64]) -> Result<Vec<Task>> {
        self.batch_apply(ids, BatchEffect::Restore).await
    }

    /// Shared all-or-nothing batch shape: fetch all requested rows in one
    /// transaction, fail naming the missing ids if any are absent, apply the
    /// effect in one statement, commit, and return pre-effect snapshots in
    /// input order. Dropping the transaction on any early return rolls back.
    async fn batch_apply(&self, ids: &[i64], effect: BatchEffect) -> Result<Vec<Task>> {
        let ids = normalize_batch_ids(ids)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to begin transaction: {e}")))?;

        let placeholders = in_placeholders(ids.len());
        // Fetch by id only: soft-deleting an already-deleted row or restoring
        // an active row is a no-op rewrite, not an error.
        let select_sql = format!("SELECT {TASK_COLUMNS} FROM todos t WHERE t.id IN ({placeholders})");
        let mut select = sqlx::query(&select_sql);
        for id in &ids {
            select = select.bind(*id);
        }
        let rows = select
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to fetch batch rows: {e}")))?;

        let mut by_id: HashMap<i64, Task> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let task = row_to_task(row)?;
            by_id.insert(task.id, task);
        }

        if by_id.len() != ids.len() {
            let missing: Vec<i64> = ids.iter().copied().filter(|id| !by_id.contains_key(id)).collect();
            debug!("Batch {} aborted, missing ids: {:?}", effect.describe(), missing);
            return Err(TaskpadError::TasksNotFound { ids: missing });
        }

        // Resolve categories before the effect; a hard delete cascades the
        // link rows away.
        let categories = categories_for_tasks(&mut *tx, &ids).await?;
        for task in by_id.values_mut() {
            if let Some(list) = categories.get(&task.id) {
                task.categories = list.clone();
            }
        }

        let effect_sql = effect.statement(&placeholders);
        let mut apply = sqlx::query(&effect_sql);
        for id in &ids {
            apply = apply.bind(*id);
        }
        apply.execute(&mut *tx).await.map_err(|e| {
            TaskpadError::database(format!("Failed to apply batch {}: {e}", effect.describe()))
        })?;

        tx.commit()
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to commit transaction: {e}")))?;

        let mut snapshots = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(task) = by_id.remove(id) {
                snapshots.push(task);
            }
        }
        info!("Batch {} applied to {} tasks", effect.describe(), snapshots.len());
        Ok(snapshots)
    }

    /// Attach a category to an active task, idempotently
    ///
    /// Attaching an already-linked pair is a no-op, not an error. Returns
    /// the task with its refreshed category list.
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` or `CategoryNotFound` when either side is
    /// absent
    #[instrument(skip(self))]
    pub async fn add_category_to_task(&self, task_id: i64, category_id: i64) -> Result<Task> {
        validate_id(task_id, "task")?;
        validate_id(category_id, "category")?;
        ensure_task_active(&self.pool, task_id).await?;
        ensure_category_exists(&self.pool, category_id).await?;

        sqlx::query("INSERT OR IGNORE INTO todos_categories (todo_id, category_id) VALUES (?, ?)")
            .bind(task_id)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to attach category: {e}")))?;

        info!("Attached category {} to task {}", category_id, task_id);
        self.get_task(task_id).await
    }

    /// Detach a category from an active task
    ///
    /// Removing an absent link is a no-op. Returns the task with its
    /// refreshed category list.
    ///
    /// # Errors
    ///
    /// Returns `TaskNotFound` when the task is absent or soft-deleted
    #[instrument(skip(self))]
    pub async fn remove_category_from_task(&self, task_id: i64, category_id: i64) -> Result<Task> {
        validate_id(task_id, "task")?;
        validate_id(category_id, "category")?;
        ensure_task_active(&self.pool, task_id).await?;

        sqlx::query("DELETE FROM todos_categories WHERE todo_id = ? AND category_id = ?")
            .bind(task_id)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to detach category: {e}")))?;

        info!("Detached category {} from task {}", category_id, task_id);
        self.get_task(task_id).await
    }

    /// Search active tasks by title or description substring, newest first
    ///
    /// Case sensitivity follows the underlying collation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty query
    #[instrument(skip(self))]
    pub async fn search_tasks(&self, query: &str) -> Result<Vec<Task>> {
        let query = normalize_search_query(query)?;
        let pattern = format!("%{query}%");

        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM todos t
             WHERE t.deleted_at IS NULL AND (t.title LIKE ? OR t.description LIKE ?)
             ORDER BY t.created_at DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to search tasks: {e}")))?;

        let mut tasks = rows.iter().map(row_to_task).collect::<Result<Vec<_>>>()?;
        self.attach_categories(&mut tasks).await?;
        debug!("Found {} tasks matching query: {}", tasks.len(), query);
        Ok(tasks)
    }

    /// List all categories, sorted by name
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, color FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to list categories: {e}")))?;

        Ok(rows.iter().map(row_to_category).collect())
    }

    /// Create a category and return it
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name or color is empty
    #[instrument(skip(self))]
    pub async fn create_category(&self, request: &CreateCategoryRequest) -> Result<Category> {
        let name = normalize_category_name(&request.name)?;
        let color = normalize_category_color(&request.color)?;

        let result = sqlx::query("INSERT INTO categories (name, color) VALUES (?, ?)")
            .bind(&name)
            .bind(&color)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to create category: {e}")))?;

        let id = result.last_insert_rowid();
        info!("Created category {} ({})", id, name);
        Ok(Category { id, name, color })
    }

    /// Delete a category; link rows cascade away, tasks are untouched
    ///
    /// Returns false when the category did not exist (not an error).
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive id
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> Result<bool> {
        validate_id(id, "category")?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| TaskpadError::database(format!("Failed to delete category {id}: {e}")))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted category {}", id);
        }
        Ok(deleted)
    }

    /// Resolve categories for the fetched tasks in one batched query
    async fn attach_categories(&self, tasks: &mut [Task]) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        let mut map = categories_for_tasks(&self.pool, &ids).await?;
        for task in tasks.iter_mut() {
            task.categories = map.remove(&task.id).unwrap_or_default();
        }
        Ok(())
    }
}

/// One batched lookup keyed by task id; tasks absent from the returned map
/// have no categories
async fn categories_for_tasks<'e, E>(
    executor: E,
    task_ids: &[i64],
) -> Result<HashMap<i64, Vec<Category>>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if task_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = in_placeholders(task_ids.len());
    let sql = format!(
        "SELECT tc.todo_id, c.id, c.name, c.color
         FROM todos_categories tc
         INNER JOIN categories c ON c.id = tc.category_id
         WHERE tc.todo_id IN ({placeholders})
         ORDER BY c.name ASC"
    );
    let mut query = sqlx::query(&sql);
    for id in task_ids {
        query = query.bind(*id);
    }
    let rows = query
        .fetch_all(executor)
        .await
        .map_err(|e| TaskpadError::database(format!("Failed to fetch task categories: {e}")))?;

    let mut map: HashMap<i64, Vec<Category>> = HashMap::new();
    for row in &rows {
        use sqlx::Row;
        let todo_id: i64 = row.get("todo_id");
        map.entry(todo_id).or_default().push(row_to_category(row));
    }
    Ok(map)
}
