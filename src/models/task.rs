use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Status filter accepted by the task list endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// Return every task regardless of completion.
    All,
    /// Only tasks with `completed = true`.
    Completed,
    /// Only tasks with `completed = false`.
    Pending,
}

/// Sort order accepted by the task list endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Newest first. The default.
    CreatedAt,
    /// Alphabetical by title.
    Title,
    /// Most recently touched first.
    UpdatedAt,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    /// The title of the task.
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 2000 characters if provided.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Input structure for a partial task update.
///
/// Absent fields leave the stored value unchanged.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Identifier of the user who owns the task. Ownership never transfers.
    pub user_id: Uuid,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Represents query parameters for the task list endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Completion filter. Defaults to returning everything.
    pub filter: Option<TaskFilter>,
    /// Sort order. Defaults to newest-created first.
    pub sort_by: Option<TaskSort>,
    /// Search term matched case-insensitively against title and description.
    pub search: Option<String>,
}

impl Task {
    /// Creates a new `Task` from `TaskCreate` input and the owner's id.
    /// Sets `created_at` and `updated_at` to the current time, `completed`
    /// to false, and `id` to a new UUID.
    pub fn new(input: TaskCreate, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}
