use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Rejects descriptions that are empty or whitespace-only.
fn validate_description(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("description_blank"));
    }
    Ok(())
}

/// Input structure for creating a task.
///
/// `deny_unknown_fields` makes any unrecognized key a deserialization error,
/// which the JSON extractor reports as 400. A `completed` value of any type
/// other than boolean (including the strings `"true"`/`"false"`) is likewise
/// rejected during deserialization.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskInput {
    /// What the task is about. Must not be blank.
    #[validate(custom = "validate_description")]
    pub description: String,

    /// Whether the task is already done. Defaults to false when omitted.
    #[serde(default)]
    pub completed: bool,
}

/// Partial update payload for `PATCH /tasks/{id}`.
///
/// Only `description` and `completed` may be changed. An empty body is
/// well-formed and leaves the task untouched.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
#[serde(deny_unknown_fields, default)]
pub struct TaskUpdate {
    #[validate(custom = "validate_description")]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.completed.is_none()
    }
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub description: String,
    pub completed: bool,
    /// Identifier of the user who owns the task. Every read and write is
    /// filtered on this column; it is never taken from client input.
    pub user_id: i32,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` from `TaskInput`, owned by `user_id`.
    ///
    /// The description is stored trimmed; `id` is a fresh UUID and both
    /// timestamps are set to the current time.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: input.description.trim().to_string(),
            completed: input.completed,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Raw query parameters for `GET /tasks`, exactly as they arrive on the wire.
///
/// Every parameter is optional; values are kept as strings so that malformed
/// input can be rejected with an explicit 400 instead of a framework-level
/// deserialization failure. See [`TaskQuery::parse`].
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// `"true"` or `"false"`: exact-match filter on the completed flag.
    pub completed: Option<String>,
    /// `field:direction`, e.g. `createdAt:desc`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Positive cap on the number of results.
    pub limit: Option<String>,
    /// Non-negative pagination offset.
    pub skip: Option<String>,
}

/// Validated listing options, produced from a [`TaskQuery`].
#[derive(Debug, PartialEq)]
pub struct TaskListOptions {
    pub completed: Option<bool>,
    pub sort: Option<TaskSort>,
    pub limit: Option<i64>,
    pub skip: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Description,
    Completed,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// The database column backing this sort field. Only ever produced from
    /// the closed set above, so it is safe to splice into ORDER BY.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Description => "description",
            SortField::Completed => "completed",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A parsed `sortBy` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TaskSort {
    /// Parses `field:direction` where field is one of `description`,
    /// `completed`, `createdAt`, `updatedAt` and direction is `asc` or
    /// `desc`. Anything else is rejected.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::BadRequest(format!("Invalid sortBy value: {}", raw));

        let (field, direction) = raw.split_once(':').ok_or_else(invalid)?;

        let field = match field {
            "description" => SortField::Description,
            "completed" => SortField::Completed,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            _ => return Err(invalid()),
        };

        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(invalid()),
        };

        Ok(TaskSort { field, direction })
    }
}

impl TaskQuery {
    /// Validates the raw query parameters.
    ///
    /// Policy: malformed values are rejected with 400 rather than silently
    /// ignored, so a typo in a filter never silently returns the unfiltered
    /// collection.
    pub fn parse(&self) -> Result<TaskListOptions, AppError> {
        let completed = match self.completed.as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "Invalid completed filter: {} (expected true or false)",
                    other
                )))
            }
        };

        let sort = match self.sort_by.as_deref() {
            None => None,
            Some(raw) => Some(TaskSort::parse(raw)?),
        };

        let limit = match self.limit.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(AppError::BadRequest(format!(
                        "Invalid limit: {} (expected a positive integer)",
                        raw
                    )))
                }
            },
        };

        let skip = match self.skip.as_deref() {
            None => 0,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => n,
                _ => {
                    return Err(AppError::BadRequest(format!(
                        "Invalid skip: {} (expected a non-negative integer)",
                        raw
                    )))
                }
            },
        };

        Ok(TaskListOptions {
            completed,
            sort,
            limit,
            skip,
        })
    }
}
