use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A dated marker placed on the roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO date string; validated on create/edit, tolerated as-is when loaded
    pub date: String,
}

impl Milestone {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            date: date.into(),
        }
    }

    /// Parsed calendar date, `None` when the stored string is not a real date
    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Parse "YYYY-MM-DD" or an RFC 3339 timestamp into a calendar date
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()))
}
