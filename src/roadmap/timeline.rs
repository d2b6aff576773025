use crate::domain::{day_label, Task};
use crate::store::matches_search;
use chrono::NaiveDate;

/// Tasks due on the same day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineGroup {
    pub date: NaiveDate,
    /// e.g. "05 gen 2024"
    pub label: String,
    pub tasks: Vec<Task>,
}

/// Group search-matching tasks with a valid due date by day, oldest first.
/// Tasks keep their board order inside a day.
pub fn plan_timeline(tasks: &[Task], term: &str) -> Vec<TimelineGroup> {
    let mut dated: Vec<(NaiveDate, &Task)> = tasks
        .iter()
        .filter(|t| matches_search(t, term))
        .filter_map(|t| t.due().map(|d| (d, t)))
        .collect();
    dated.sort_by_key(|(d, _)| *d);

    let mut groups: Vec<TimelineGroup> = Vec::new();
    for (date, task) in dated {
        match groups.last_mut() {
            Some(group) if group.date == date => group.tasks.push(task.clone()),
            _ => groups.push(TimelineGroup {
                date,
                label: day_label(date),
                tasks: vec![task.clone()],
            }),
        }
    }
    groups
}
