//! Taskpad CLI - command line interface over the taskpad-core library

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use taskpad_core::{
    BoolInput, Category, CreateCategoryRequest, CreateTaskRequest, Page, PriorityInput, Result,
    Task, TaskListParams, TaskpadDatabase, TaskpadError, UpdateTaskRequest,
};

#[derive(Parser, Debug)]
#[command(name = "taskpad")]
#[command(about = "SQLite-backed task tracking with soft delete and categories")]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to TASKPAD_DB_PATH or ./taskpad.db)
    #[arg(long, short)]
    pub database: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List active tasks
    List {
        /// Filter by completion: true/false/1/0
        #[arg(long)]
        completed: Option<String>,
        /// Filter by priority: 1 (low), 2 (medium), 3 (high)
        #[arg(long)]
        priority: Option<i64>,
        /// Only tasks linked to this category id
        #[arg(long)]
        category: Option<i64>,
        /// Page number (activates pagination)
        #[arg(long)]
        page: Option<i64>,
        /// Page size (activates pagination, capped at 100)
        #[arg(long, short)]
        limit: Option<i64>,
        /// Sort column: title, created_at, priority, completed
        #[arg(long)]
        sort_by: Option<String>,
        /// Sort direction: asc or desc
        #[arg(long)]
        sort_order: Option<String>,
    },
    /// List soft-deleted tasks
    Deleted {
        /// Page number (activates pagination)
        #[arg(long)]
        page: Option<i64>,
        /// Page size (activates pagination, capped at 100)
        #[arg(long, short)]
        limit: Option<i64>,
    },
    /// Show one task
    Get {
        /// Task id
        id: i64,
    },
    /// Create a task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(long, short)]
        description: Option<String>,
        /// Priority: 1 (low), 2 (medium), 3 (high)
        #[arg(long, short)]
        priority: Option<i64>,
    },
    /// Update fields of a task
    Update {
        /// Task id
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long, short)]
        description: Option<String>,
        /// Completion flag: true/false/1/0
        #[arg(long)]
        completed: Option<String>,
        /// Priority: 1 (low), 2 (medium), 3 (high)
        #[arg(long, short)]
        priority: Option<i64>,
    },
    /// Permanently delete one task
    Rm {
        /// Task id
        id: i64,
    },
    /// Permanently delete several tasks (all or nothing)
    Purge {
        /// Task ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Soft-delete several tasks (all or nothing)
    Trash {
        /// Task ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Restore soft-deleted tasks (all or nothing)
    Restore {
        /// Task ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Search titles and descriptions
    Search {
        /// Search query
        query: String,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Link a category to a task
    Tag {
        /// Task id
        task_id: i64,
        /// Category id
        category_id: i64,
    },
    /// Unlink a category from a task
    Untag {
        /// Task id
        task_id: i64,
        /// Category id
        category_id: i64,
    },
    /// Check database connectivity and show row counts
    Health,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum CategoryAction {
    /// List all categories
    List,
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Display color, e.g. #00FF00
        color: String,
    },
    /// Delete a category and its task links
    Rm {
        /// Category id
        id: i64,
    },
}

/// Print tasks to the given writer
///
/// # Errors
/// Returns an error if writing fails
pub fn print_tasks<W: Write>(tasks: &[Task], writer: &mut W) -> Result<()> {
    if tasks.is_empty() {
        writeln!(writer, "No tasks found")?;
        return Ok(());
    }

    writeln!(writer, "Found {} tasks:", tasks.len())?;
    for task in tasks {
        let check = if task.completed { "x" } else { " " };
        writeln!(
            writer,
            "  [{check}] #{} {} (priority {})",
            task.id,
            task.title,
            task.priority.as_i64()
        )?;
        if !task.description.is_empty() {
            writeln!(writer, "      {}", task.description)?;
        }
        if !task.categories.is_empty() {
            let names: Vec<&str> = task.categories.iter().map(|c| c.name.as_str()).collect();
            writeln!(writer, "      Categories: {}", names.join(", "))?;
        }
        if let Some(deleted_at) = task.deleted_at {
            writeln!(
                writer,
                "      Deleted: {}",
                taskpad_common::format_datetime(&deleted_at)
            )?;
        }
    }
    Ok(())
}

/// Print a page of tasks, with pagination metadata when present
///
/// # Errors
/// Returns an error if writing fails
pub fn print_page<W: Write>(page: &Page<Task>, writer: &mut W) -> Result<()> {
    print_tasks(&page.items, writer)?;
    if let Some(info) = page.pagination {
        writeln!(
            writer,
            "Page {} of {} ({} total, {} per page)",
            info.page, info.total_pages, info.total, info.limit
        )?;
    }
    Ok(())
}

/// Print categories to the given writer
///
/// # Errors
/// Returns an error if writing fails
pub fn print_categories<W: Write>(categories: &[Category], writer: &mut W) -> Result<()> {
    if categories.is_empty() {
        writeln!(writer, "No categories found")?;
        return Ok(());
    }

    writeln!(writer, "Found {} categories:", categories.len())?;
    for category in categories {
        writeln!(
            writer,
            "  • #{} {} ({})",
            category.id, category.name, category.color
        )?;
    }
    Ok(())
}

/// Perform a health check on the database
///
/// # Errors
/// Returns an error if the database is not accessible
pub async fn health_check<W: Write>(db: &TaskpadDatabase, writer: &mut W) -> Result<()> {
    writeln!(writer, "🔍 Checking taskpad database connection...")?;

    if !db.is_connected().await {
        return Err(TaskpadError::database("Database is not connected"));
    }

    let stats = db.get_stats().await?;
    writeln!(writer, "✅ Database connection successful!")?;
    writeln!(
        writer,
        "   {} active tasks ({} completed), {} in trash, {} categories",
        stats.active_tasks, stats.completed_tasks, stats.deleted_tasks, stats.categories
    )?;

    writeln!(writer, "🎉 All systems operational!")?;
    Ok(())
}

/// Execute a parsed command against the database, writing output to `writer`
///
/// # Errors
/// Returns an error if the operation or writing fails
pub async fn run_command<W: Write>(
    db: &TaskpadDatabase,
    command: Commands,
    writer: &mut W,
) -> Result<()> {
    match command {
        Commands::List {
            completed,
            priority,
            category,
            page,
            limit,
            sort_by,
            sort_order,
        } => {
            let params = TaskListParams {
                completed: completed.map(BoolInput::Text),
                priority: priority.map(PriorityInput::Int),
                category_id: category,
                page,
                limit,
                sort_by,
                sort_order,
            };
            let page = db.list_tasks(&params).await?;
            print_page(&page, writer)?;
        }
        Commands::Deleted { page, limit } => {
            let page = db.list_deleted_tasks(page, limit).await?;
            print_page(&page, writer)?;
        }
        Commands::Get { id } => {
            let task = db.get_task(id).await?;
            print_tasks(std::slice::from_ref(&task), writer)?;
        }
        Commands::Add {
            title,
            description,
            priority,
        } => {
            let id = db
                .create_task(&CreateTaskRequest {
                    title,
                    description,
                    priority: priority.map(PriorityInput::Int),
                })
                .await?;
            let task = db.get_task(id).await?;
            writeln!(writer, "Created task #{id}")?;
            print_tasks(std::slice::from_ref(&task), writer)?;
        }
        Commands::Update {
            id,
            title,
            description,
            completed,
            priority,
        } => {
            let task = db
                .update_task(
                    id,
                    &UpdateTaskRequest {
                        title,
                        description,
                        completed: completed.map(BoolInput::Text),
                        priority: priority.map(PriorityInput::Int),
                    },
                )
                .await?;
            writeln!(writer, "Updated task #{id}")?;
            print_tasks(std::slice::from_ref(&task), writer)?;
        }
        Commands::Rm { id } => {
            let task = db.delete_task(id).await?;
            writeln!(writer, "Deleted task #{}: {}", task.id, task.title)?;
        }
        Commands::Purge { ids } => {
            let tasks = db.batch_delete_tasks(&ids).await?;
            writeln!(writer, "Permanently deleted {} tasks:", tasks.len())?;
            for task in &tasks {
                writeln!(writer, "  • #{} {}", task.id, task.title)?;
            }
        }
        Commands::Trash { ids } => {
            let tasks = db.batch_soft_delete_tasks(&ids).await?;
            writeln!(writer, "Moved {} tasks to the trash:", tasks.len())?;
            for task in &tasks {
                writeln!(writer, "  • #{} {}", task.id, task.title)?;
            }
        }
        Commands::Restore { ids } => {
            let tasks = db.batch_restore_tasks(&ids).await?;
            writeln!(writer, "Restored {} tasks:", tasks.len())?;
            for task in &tasks {
                writeln!(writer, "  • #{} {}", task.id, task.title)?;
            }
        }
        Commands::Search { query } => {
            let tasks = db.search_tasks(&query).await?;
            print_tasks(&tasks, writer)?;
        }
        Commands::Category { action } => match action {
            CategoryAction::List => {
                let categories = db.list_categories().await?;
                print_categories(&categories, writer)?;
            }
            CategoryAction::Add { name, color } => {
                let category = db
                    .create_category(&CreateCategoryRequest { name, color })
                    .await?;
                writeln!(
                    writer,
                    "Created category #{} {} ({})",
                    category.id, category.name, category.color
                )?;
            }
            CategoryAction::Rm { id } => {
                if db.delete_category(id).await? {
                    writeln!(writer, "Deleted category #{id}")?;
                } else {
                    writeln!(writer, "Category #{id} not found")?;
                }
            }
        },
        Commands::Tag {
            task_id,
            category_id,
        } => {
            let task = db.add_category_to_task(task_id, category_id).await?;
            writeln!(writer, "Tagged task #{task_id} with category #{category_id}")?;
            print_tasks(std::slice::from_ref(&task), writer)?;
        }
        Commands::Untag {
            task_id,
            category_id,
        } => {
            db.remove_category_from_task(task_id, category_id).await?;
            writeln!(
                writer,
                "Removed category #{category_id} from task #{task_id}"
            )?;
        }
        Commands::Health => {
            health_check(db, writer).await?;
        }
    }
    Ok(())
}
