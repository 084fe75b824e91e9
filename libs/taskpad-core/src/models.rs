//! Data models for taskpad entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority enumeration, stored as the bare integer 1..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    /// Integer representation used in the database
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Parse the stored integer back into a priority
    #[must_use]
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Priority::from_i64(i64::from(value))
            .ok_or_else(|| format!("priority must be 1, 2, or 3, got {value}"))
    }
}

/// Main task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Surrogate key assigned by the store
    pub id: i64,
    /// Task title (1-200 characters)
    pub title: String,
    /// Task description (up to 1000 characters, empty by default)
    pub description: String,
    /// Completion flag, stored as 0/1 and round-tripped to bool
    pub completed: bool,
    /// Task priority
    pub priority: Priority,
    /// Creation timestamp, set once at insert
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, refreshed on every mutating update
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; `None` means the task is active
    pub deleted_at: Option<DateTime<Utc>>,
    /// Associated categories (derived, not a stored column)
    pub categories: Vec<Category>,
}

impl Task {
    /// True when the task has not been soft-deleted
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Surrogate key assigned by the store
    pub id: i64,
    /// Category name (non-empty)
    pub name: String,
    /// Category color (hex or name, format unvalidated)
    pub color: String,
}

/// Boolean input accepted from loosely-typed callers
///
/// The accepted set is closed: `true`/`false`, `1`/`0`, `"true"`/`"false"`,
/// `"1"`/`"0"`. Anything else is a validation error, never a silent default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoolInput {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for BoolInput {
    fn from(value: bool) -> Self {
        BoolInput::Bool(value)
    }
}

/// Priority input accepted from loosely-typed callers (integer or integer string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityInput {
    Int(i64),
    Text(String),
}

impl From<Priority> for PriorityInput {
    fn from(priority: Priority) -> Self {
        PriorityInput::Int(priority.as_i64())
    }
}

/// Sortable task columns for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    CreatedAt,
    Priority,
    Completed,
}

impl SortField {
    /// Column name used in generated SQL (whitelisted, never caller-supplied)
    #[must_use]
    pub fn as_column(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::CreatedAt => "created_at",
            SortField::Priority => "priority",
            SortField::Completed => "completed",
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        SortField::CreatedAt
    }
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// SQL keyword for the direction
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

/// Task creation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (required, 1-200 characters after trimming)
    pub title: String,
    /// Optional description (up to 1000 characters, defaults to empty)
    pub description: Option<String>,
    /// Optional priority (defaults to medium)
    pub priority: Option<PriorityInput>,
}

/// Partial task update request; only supplied fields are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New completion flag (same coercion rule as the list filter)
    pub completed: Option<BoolInput>,
    /// New priority
    pub priority: Option<PriorityInput>,
}

impl UpdateTaskRequest {
    /// True when no fields were supplied; such updates leave the row untouched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
    }
}

/// Category creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name (non-empty after trimming)
    pub name: String,
    /// Category color (non-empty after trimming)
    pub color: String,
}

/// Filter, sort, and pagination parameters for task listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListParams {
    /// Filter by completion flag
    pub completed: Option<BoolInput>,
    /// Filter by priority
    pub priority: Option<PriorityInput>,
    /// Only tasks linked to this category
    pub category_id: Option<i64>,
    /// Page number (supplying either page or limit activates pagination)
    pub page: Option<i64>,
    /// Page size, capped server-side
    pub limit: Option<i64>,
    /// Sort column; unknown values fall back to `created_at`
    pub sort_by: Option<String>,
    /// Sort direction; unknown values fall back to `desc`
    pub sort_order: Option<String>,
}

impl TaskListParams {
    /// Pagination activates when either page or limit was supplied
    #[must_use]
    pub fn wants_pagination(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }
}

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    /// Total matching rows, pre-pagination
    pub total: i64,
    pub total_pages: i64,
}

/// A page of results; `pagination` is `None` when pagination was not requested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<PageInfo>,
}

impl<T> Page<T> {
    /// An unpaginated result set
    #[must_use]
    pub fn unpaged(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }
}

/// Row counts surfaced by the health check
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub active_tasks: u64,
    pub completed_tasks: u64,
    pub deleted_tasks: u64,
    pub categories: u64,
}
