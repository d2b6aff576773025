//! Task and milestone operations on the current project's working copy.
//!
//! Stale ids (a card deleted in another view, a drag that outlived its
//! source) are not errors: those calls return `false` and change nothing.
//! Every mutation persists the whole board.

use super::{fresh_id, matches_search, ProjectStore};
use crate::domain::{
    clean_due_date, parse_date, sample_tasks, today, Milestone, RoadmapScale, Status, Task,
    TaskPatch, ColumnState,
};
use crate::error::BoardError;
use crate::persistence::Backend;

/// What `archive_completed` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// The project has no tasks at all
    NoTasks,
    /// Tasks exist but none is done
    NothingToArchive,
    Archived(usize),
}

impl<B: Backend> ProjectStore<B> {
    /// Append a new task; a blank title is ignored
    pub fn add_task(
        &mut self,
        title: &str,
        description: &str,
        due_date: Option<&str>,
        status: Status,
    ) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let tasks = &self.working.tasks;
        let id = fresh_id("", |id| tasks.iter().any(|t| t.id == id));
        self.working.tasks.push(Task::new(
            id.clone(),
            title,
            description.trim(),
            status,
            clean_due_date(due_date.map(str::to_string)),
        ));
        self.save();
        Some(id)
    }

    /// Merge `patch` into the task with `id`
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> bool {
        let Some(task) = self.working.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        patch.apply(task);
        self.save();
        true
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.working.tasks.len();
        self.working.tasks.retain(|t| t.id != id);
        if self.working.tasks.len() == before {
            return false;
        }
        if self.session.editing_task_id.as_deref() == Some(id) {
            self.session.editing_task_id = None;
        }
        self.save();
        true
    }

    /// Drop target of drag-and-drop and of manual status edits
    pub fn move_task(&mut self, id: &str, status: Option<Status>) -> bool {
        let Some(status) = status else {
            return false;
        };
        let Some(task) = self.working.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.status = status;
        self.save();
        true
    }

    /// Remove every done task, keeping the others in order
    pub fn archive_completed(&mut self) -> ArchiveOutcome {
        if self.working.tasks.is_empty() {
            return ArchiveOutcome::NoTasks;
        }
        let done = self
            .working
            .tasks
            .iter()
            .filter(|t| t.status == Status::Done)
            .count();
        if done == 0 {
            return ArchiveOutcome::NothingToArchive;
        }

        let editing_done = self.session.editing_task_id.as_deref().map_or(false, |id| {
            self.working
                .tasks
                .iter()
                .any(|t| t.id == id && t.status == Status::Done)
        });
        if editing_done {
            self.session.editing_task_id = None;
        }

        self.working.tasks.retain(|t| t.status != Status::Done);
        self.save();
        ArchiveOutcome::Archived(done)
    }

    /// Replace the current project's tasks with the sample cards
    pub fn reset_to_sample(&mut self) {
        self.working.tasks = sample_tasks(today());
        self.working.column_state = ColumnState::default();
        self.session.editing_task_id = None;
        self.save();
    }

    pub fn toggle_column(&mut self, status: Status) {
        self.working.column_state.toggle(status);
        self.save();
    }

    pub fn set_roadmap_scale(&mut self, scale: RoadmapScale) {
        self.working.roadmap_scale = scale;
        self.save();
    }

    pub fn add_milestone(
        &mut self,
        title: &str,
        date: &str,
        description: &str,
    ) -> Result<String, BoardError> {
        let (title, date) = validate_milestone(title, date)?;

        let milestones = &self.working.milestones;
        let id = fresh_id("m", |id| milestones.iter().any(|m| m.id == id));
        self.working
            .milestones
            .push(Milestone::new(id.clone(), title, date, description.trim()));
        self.save();
        Ok(id)
    }

    /// Replace a milestone's fields; `Ok(false)` when `id` is unknown
    pub fn update_milestone(
        &mut self,
        id: &str,
        title: &str,
        date: &str,
        description: &str,
    ) -> Result<bool, BoardError> {
        let (title, date) = validate_milestone(title, date)?;

        let Some(milestone) = self.working.milestones.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };
        milestone.title = title;
        milestone.date = date;
        milestone.description = description.trim().to_string();
        self.save();
        Ok(true)
    }

    pub fn delete_milestone(&mut self, id: &str) -> bool {
        let before = self.working.milestones.len();
        self.working.milestones.retain(|m| m.id != id);
        if self.working.milestones.len() == before {
            return false;
        }
        self.save();
        true
    }

    /// Open a task in the edit form; unknown ids leave the session untouched
    pub fn begin_edit(&mut self, id: &str) -> Option<&Task> {
        let task = self.working.tasks.iter().find(|t| t.id == id)?;
        self.session.editing_task_id = Some(task.id.clone());
        Some(task)
    }

    pub fn cancel_edit(&mut self) {
        self.session.editing_task_id = None;
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.session.search_term = term.trim().to_lowercase();
    }

    /// Tasks matching the current search term, in board order
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.working
            .tasks
            .iter()
            .filter(|t| matches_search(t, &self.session.search_term))
            .collect()
    }

    /// Visible tasks of one column
    pub fn column(&self, status: Status) -> Vec<&Task> {
        self.visible_tasks()
            .into_iter()
            .filter(|t| t.status == status)
            .collect()
    }
}

/// Trimmed title and date, or the reason they are rejected
fn validate_milestone(title: &str, date: &str) -> Result<(String, String), BoardError> {
    let date = date.trim();
    if parse_date(date).is_none() {
        return Err(BoardError::InvalidDate(date.to_string()));
    }
    let title = title.trim();
    if title.is_empty() {
        return Err(BoardError::EmptyTitle);
    }
    Ok((title.to_string(), date.to_string()))
}
