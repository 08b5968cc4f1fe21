use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority. The default for new tasks.
    Medium,
    /// High priority.
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started. The initial status of every task.
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed. Reaching this status stamps `completed_at`.
    Done,
}

/// Input structure for creating a task. New tasks always start in `todo`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// The priority of the task. Defaults to `medium` when omitted.
    pub priority: Option<TaskPriority>,

    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,

    /// Free-form tag strings. Defaults to an empty list.
    pub tags: Option<Vec<String>>,

    /// Whether the task is hidden from shared views. Defaults to false.
    pub is_private: Option<bool>,
}

/// Partial update for an existing task. Absent fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Moving to `done` stamps `completed_at`; moving to any other status
    /// clears it; omitting the field leaves it untouched.
    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<DateTime<Utc>>,

    pub tags: Option<Vec<String>>,

    pub is_private: Option<bool>,
}

/// Task row as stored in the database. Tags live in a JSON-encoded text
/// column; `TaskRow` keeps the raw string and converts to `Task` for
/// responses.
#[derive(Debug, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub tags: String,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a task entity as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Identifier of the user who owns the task.
    pub user_id: i32,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// The current status of the task.
    pub status: TaskStatus,
    /// The priority of the task.
    pub priority: TaskPriority,
    /// Free-form tag strings.
    pub tags: Vec<String>,
    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,
    /// Set when the task transitions to `done`; cleared when it leaves it.
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the task is hidden from shared views.
    pub is_private: bool,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            tags: parse_tags(&row.tags),
            due_date: row.due_date,
            completed_at: row.completed_at,
            is_private: row.is_private,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Decodes the JSON-encoded tag column. Anything unparseable reads as an
/// empty list rather than an error.
pub fn parse_tags(value: &str) -> Vec<String> {
    serde_json::from_str(value).unwrap_or_default()
}

/// Represents query parameters for filtering tasks when listing them.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size, clamped to 1..=50. Defaults to 10.
    pub limit: Option<i64>,
    /// Filter tasks by status.
    pub status: Option<TaskStatus>,
    /// Filter tasks by priority.
    pub priority: Option<TaskPriority>,
    /// Only tasks due strictly before this instant.
    pub due_before: Option<DateTime<Utc>>,
    /// Search term matched case-insensitively against title and description.
    pub q: Option<String>,
}

impl Task {
    /// Creates a new `Task` from `TaskInput` and the creator's `user_id`,
    /// applying the defaults: status `todo`, priority `medium`, empty tags,
    /// not private.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            status: TaskStatus::Todo,
            priority: input.priority.unwrap_or(TaskPriority::Medium),
            tags: input.tags.unwrap_or_default(),
            due_date: input.due_date,
            completed_at: None,
            is_private: input.is_private.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    /// The tag list as it is stored: a JSON-encoded string.
    pub fn tags_json(&self) -> String {
        serde_json::to_string(&self.tags).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation_defaults() {
        let input = TaskInput {
            title: "Test Task".to_string(),
            description: Some("Test Description".to_string()),
            priority: None,
            due_date: None,
            tags: None,
            is_private: None,
        };

        let task = Task::new(input, 1);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, 1);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.tags.is_empty());
        assert!(!task.is_private);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_task_input_validation() {
        let invalid_input_empty_title = TaskInput {
            title: "".to_string(),
            description: Some("Test Description".to_string()),
            priority: Some(TaskPriority::High),
            due_date: None,
            tags: None,
            is_private: None,
        };
        assert!(
            invalid_input_empty_title.validate().is_err(),
            "Validation should fail for empty title."
        );

        let long_title = "a".repeat(201);
        let invalid_input_long_title = TaskInput {
            title: long_title,
            description: None,
            priority: None,
            due_date: None,
            tags: None,
            is_private: None,
        };
        assert!(
            invalid_input_long_title.validate().is_err(),
            "Validation should fail for overly long title."
        );

        let long_description = "b".repeat(1001);
        let invalid_input_long_desc = TaskInput {
            title: "Valid title".to_string(),
            description: Some(long_description),
            priority: None,
            due_date: None,
            tags: None,
            is_private: None,
        };
        assert!(
            invalid_input_long_desc.validate().is_err(),
            "Validation should fail for overly long description."
        );

        let valid_input = TaskInput {
            title: "Valid Title".to_string(),
            description: Some("Test Description".to_string()),
            priority: Some(TaskPriority::Low),
            due_date: None,
            tags: Some(vec!["planning".to_string()]),
            is_private: Some(true),
        };
        assert!(valid_input.validate().is_ok());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(r#"["planning","team"]"#),
            vec!["planning".to_string(), "team".to_string()]
        );
        assert_eq!(parse_tags("[]"), Vec::<String>::new());
        assert_eq!(parse_tags("not json"), Vec::<String>::new());
        assert_eq!(parse_tags(r#"{"a":1}"#), Vec::<String>::new());
    }

    #[test]
    fn test_tags_round_trip_through_storage_form() {
        let input = TaskInput {
            title: "Tagged".to_string(),
            description: None,
            priority: None,
            due_date: None,
            tags: Some(vec!["writing".to_string(), "stakeholders".to_string()]),
            is_private: None,
        };
        let task = Task::new(input, 2);
        assert_eq!(parse_tags(&task.tags_json()), task.tags);
    }
}
