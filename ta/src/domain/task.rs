//! Task and Checkbox domain types
//!
//! A Task is one line of a day plan's schedule. Checkboxes are sub-activities
//! nested under a task, independently checkable.

use serde::{Deserialize, Deserializer, Serialize};

/// Task status within a day plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// One scheduled activity within a day plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend task identifier. Older records omit it, and some emit it as a
    /// JSON number rather than a string; both forms are accepted.
    #[serde(default, deserialize_with = "id_string_or_number")]
    pub id: Option<String>,

    /// Task title
    pub title: String,

    /// Longer description
    #[serde(default)]
    pub description: String,

    /// Time allocation as a display range (e.g. "09:00 - 11:00")
    #[serde(default)]
    pub time_allocation: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Free-form remarks
    #[serde(default)]
    pub remarks: String,
}

impl Task {
    /// Create a task with just a title (remaining fields default)
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            time_allocation: String::new(),
            status: TaskStatus::Pending,
            remarks: String::new(),
        }
    }

    /// A task is blank when its title is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// A sub-activity nested under a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkbox {
    /// Display label
    pub label: String,

    /// Whether the activity has been checked off
    #[serde(default)]
    pub checked: bool,

    /// Time allocation as a display range
    #[serde(default)]
    pub time_allocation: String,
}

/// Accept a task id serialized as either a JSON string or a JSON number.
fn id_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdForm {
        Text(String),
        Num(i64),
    }

    let form = Option::<IdForm>::deserialize(deserializer)?;
    Ok(form.map(|v| match v {
        IdForm::Text(s) => s,
        IdForm::Num(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new("Review pull requests");
        assert_eq!(task.title, "Review pull requests");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.id.is_none());
    }

    #[test]
    fn test_task_is_blank() {
        assert!(Task::new("").is_blank());
        assert!(Task::new("   ").is_blank());
        assert!(!Task::new("Standup").is_blank());
    }

    #[test]
    fn test_task_id_as_string() {
        let task: Task = serde_json::from_str(r#"{"id": "t-42", "title": "Demo"}"#).unwrap();
        assert_eq!(task.id.as_deref(), Some("t-42"));
    }

    #[test]
    fn test_task_id_as_number() {
        let task: Task = serde_json::from_str(r#"{"id": 42, "title": "Demo"}"#).unwrap();
        assert_eq!(task.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_task_id_missing() {
        let task: Task = serde_json::from_str(r#"{"title": "Demo"}"#).unwrap();
        assert!(task.id.is_none());
    }

    #[test]
    fn test_task_wire_field_names() {
        let json = r#"{"title": "Demo", "timeAllocation": "09:00 - 10:00", "status": "in_progress"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.time_allocation, "09:00 - 10:00");
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_checkbox_defaults() {
        let cb: Checkbox = serde_json::from_str(r#"{"label": "Read docs"}"#).unwrap();
        assert_eq!(cb.label, "Read docs");
        assert!(!cb.checked);
        assert!(cb.time_allocation.is_empty());
    }

    #[test]
    fn test_task_status_display() {
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }
}
