use serde::{Deserialize, Serialize};

/// Kanban column a task lives in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    #[serde(rename = "inprogress")]
    InProgress,
    Pending,
    Done,
}

impl Status {
    /// Parse status from its persisted key like "inprogress"
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "inprogress" => Some(Self::InProgress),
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    /// Convert status to its persisted key
    pub fn key(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }

    /// Columns in board order
    pub fn all() -> &'static [Status] {
        &[Status::Todo, Status::InProgress, Status::Pending, Status::Done]
    }
}

/// Granularity of the roadmap cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadmapScale {
    Weeks,
    #[default]
    Months,
    Quarters,
}

impl RoadmapScale {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            "quarters" => Some(Self::Quarters),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Quarters => "quarters",
        }
    }
}
