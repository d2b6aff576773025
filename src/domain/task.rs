use super::enums::Status;
use super::milestone::parse_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique within the owning project
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    /// ISO date string ("YYYY-MM-DD"), kept verbatim
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        status: Status,
        due_date: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            status,
            due_date,
        }
    }

    /// Parsed due date, if present and valid
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_date)
    }
}

/// Partial update for a task; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<String>>,
}

impl TaskPatch {
    /// Merge into `task`; the id is never touched and a blank title is ignored
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            let title = title.trim();
            if !title.is_empty() {
                task.title = title.to_string();
            }
        }
        if let Some(description) = self.description {
            task.description = description.trim().to_string();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = clean_due_date(due_date);
        }
    }
}

/// Blank due dates are stored as null
pub fn clean_due_date(due_date: Option<String>) -> Option<String> {
    due_date
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_camel_case_with_null_due_date() {
        let task = Task::new("1", "Write docs", "", Status::InProgress, None);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["status"], "inprogress");
        assert!(json["dueDate"].is_null());
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn test_patch_preserves_id_and_ignores_blank_title() {
        let mut task = Task::new("42", "Old", "desc", Status::Todo, Some("2024-03-01".into()));
        TaskPatch {
            title: Some("   ".into()),
            description: Some(" new desc ".into()),
            status: Some(Status::Pending),
            due_date: Some(None),
        }
        .apply(&mut task);

        assert_eq!(task.id, "42");
        assert_eq!(task.title, "Old");
        assert_eq!(task.description, "new desc");
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn test_due_parses_only_valid_dates() {
        let mut task = Task::new("1", "T", "", Status::Todo, Some("2024-02-29".into()));
        assert_eq!(task.due(), NaiveDate::from_ymd_opt(2024, 2, 29));
        task.due_date = Some("2023-02-29".into());
        assert_eq!(task.due(), None);
    }
}
