//! SQL query builder utilities for task queries
//!
//! Builders assemble parameterized SQL from normalized inputs. Column and
//! direction fragments come from closed enums, never from caller strings,
//! so the generated text is injection-safe by construction.

use crate::models::{Priority, SortField, SortOrder, UpdateTaskRequest};

/// Columns selected for every task row
pub const TASK_COLUMNS: &str =
    "t.id, t.title, t.description, t.completed, t.priority, t.created_at, t.updated_at, t.deleted_at";

/// Produce `?, ?, ...` for an IN clause with `count` bindings
#[must_use]
pub fn in_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Builder for the filtered task listing and its matching count query
///
/// The data and count queries share one join and WHERE assembly, so their
/// totals can never disagree. Bind values in the order reported by
/// [`TaskListQueryBuilder::bind_order`]: category id (when filtering by
/// category), completed, priority, then limit and offset for the data query.
#[derive(Debug, Clone, Default)]
pub struct TaskListQueryBuilder {
    completed: Option<bool>,
    priority: Option<Priority>,
    category: bool,
    sort_by: SortField,
    sort_order: SortOrder,
    paginate: bool,
}

impl TaskListQueryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the completed flag
    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Filter on priority
    #[must_use]
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restrict to tasks linked to one category
    ///
    /// This switches the category join to an inner join, so tasks without
    /// the category drop out of both the data and count queries.
    #[must_use]
    pub fn with_category_filter(mut self) -> Self {
        self.category = true;
        self
    }

    /// Set the sort column and direction
    #[must_use]
    pub fn order_by(mut self, sort_by: SortField, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Append LIMIT/OFFSET placeholders to the data query
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.paginate = true;
        self
    }

    fn from_clause(&self) -> String {
        if self.category {
            // The (todo_id, category_id) pair is unique, so an inner join on a
            // fixed category id yields at most one row per task and COUNT(*)
            // stays exact without DISTINCT.
            "FROM todos t INNER JOIN todos_categories tc ON tc.todo_id = t.id AND tc.category_id = ?"
                .to_string()
        } else {
            "FROM todos t".to_string()
        }
    }

    fn where_clause(&self) -> String {
        let mut conditions = vec!["t.deleted_at IS NULL".to_string()];
        if self.completed.is_some() {
            conditions.push("t.completed = ?".to_string());
        }
        if self.priority.is_some() {
            conditions.push("t.priority = ?".to_string());
        }
        format!("WHERE {}", conditions.join(" AND "))
    }

    /// Build the data query
    ///
    /// The id tiebreaker keeps the order total: `created_at` has one-second
    /// resolution, and rows with fully tied sort keys would otherwise move
    /// between the separate page queries.
    #[must_use]
    pub fn data_query(&self) -> String {
        let mut query = format!(
            "SELECT {TASK_COLUMNS} {} {} ORDER BY t.{} {}, t.id DESC",
            self.from_clause(),
            self.where_clause(),
            self.sort_by.as_column(),
            self.sort_order.as_sql(),
        );
        if self.paginate {
            query.push_str(" LIMIT ? OFFSET ?");
        }
        query
    }

    /// Build the count query with the same join and filter shape
    #[must_use]
    pub fn count_query(&self) -> String {
        format!("SELECT COUNT(*) {} {}", self.from_clause(), self.where_clause())
    }

    /// Filter values in bind order, for logging and tests
    #[must_use]
    pub fn bind_order(&self) -> Vec<&'static str> {
        let mut order = Vec::new();
        if self.category {
            order.push("category_id");
        }
        if self.completed.is_some() {
            order.push("completed");
        }
        if self.priority.is_some() {
            order.push("priority");
        }
        order
    }

    /// The normalized completed filter, if any
    #[must_use]
    pub fn completed_filter(&self) -> Option<bool> {
        self.completed
    }

    /// The normalized priority filter, if any
    #[must_use]
    pub fn priority_filter(&self) -> Option<Priority> {
        self.priority
    }
}

/// Builder for partial UPDATE statements on the todos table
///
/// Tracks which fields the caller supplied and emits one statement that
/// writes exactly those columns plus `updated_at`. The WHERE clause keeps
/// the update scoped to active rows.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdateBuilder {
    updates: Vec<String>,
}

impl TaskUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from an `UpdateTaskRequest`, marking supplied fields
    #[must_use]
    pub fn from_request(request: &UpdateTaskRequest) -> Self {
        let mut builder = Self::new();

        if request.title.is_some() {
            builder = builder.add_field("title");
        }
        if request.description.is_some() {
            builder = builder.add_field("description");
        }
        if request.completed.is_some() {
            builder = builder.add_field("completed");
        }
        if request.priority.is_some() {
            builder = builder.add_field("priority");
        }

        builder
    }

    /// Add a column to the SET list
    #[must_use]
    pub fn add_field(mut self, field_name: &str) -> Self {
        self.updates.push(format!("{field_name} = ?"));
        self
    }

    /// True when no fields have been marked; callers skip the UPDATE entirely
    /// so `updated_at` stays untouched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Number of fields being updated
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Build the complete UPDATE statement, always bumping `updated_at`
    #[must_use]
    pub fn build_query_string(&self) -> String {
        let mut all_updates = self.updates.clone();
        all_updates.push("updated_at = CURRENT_TIMESTAMP".to_string());
        format!(
            "UPDATE todos SET {} WHERE id = ? AND deleted_at IS NULL",
            all_updates.join(", ")
        )
    }

    /// Column names being updated, for logging
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        self.updates
            .iter()
            .map(|u| u.split(" = ").next().unwrap_or("").to_string())
            .collect()
    }
}
