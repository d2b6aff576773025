use super::enums::{RoadmapScale, Status};
use super::milestone::Milestone;
use super::task::Task;
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Collapsed flag per board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    pub todo: bool,
    pub inprogress: bool,
    pub pending: bool,
    pub done: bool,
}

impl Default for ColumnState {
    /// Only the done column starts collapsed
    fn default() -> Self {
        Self {
            todo: false,
            inprogress: false,
            pending: false,
            done: true,
        }
    }
}

impl ColumnState {
    pub fn is_collapsed(&self, status: Status) -> bool {
        match status {
            Status::Todo => self.todo,
            Status::InProgress => self.inprogress,
            Status::Pending => self.pending,
            Status::Done => self.done,
        }
    }

    pub fn set_collapsed(&mut self, status: Status, collapsed: bool) {
        match status {
            Status::Todo => self.todo = collapsed,
            Status::InProgress => self.inprogress = collapsed,
            Status::Pending => self.pending = collapsed,
            Status::Done => self.done = collapsed,
        }
    }

    pub fn toggle(&mut self, status: Status) {
        let collapsed = self.is_collapsed(status);
        self.set_collapsed(status, !collapsed);
    }
}

/// An isolated board: tasks, milestones and view preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
    pub column_state: ColumnState,
    pub milestones: Vec<Milestone>,
    pub roadmap_scale: RoadmapScale,
}

impl Project {
    /// A project with no tasks or milestones and default view settings
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks: Vec::new(),
            column_state: ColumnState::default(),
            milestones: Vec::new(),
            roadmap_scale: RoadmapScale::default(),
        }
    }

    /// The project created on first run
    pub fn demo(today: NaiveDate) -> Self {
        Self {
            tasks: sample_tasks(today),
            milestones: seed_milestones(today),
            ..Self::empty("default", "Progetto demo")
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// The current project's mutable state, held outside the project map while active
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkingCopy {
    pub tasks: Vec<Task>,
    pub column_state: ColumnState,
    pub milestones: Vec<Milestone>,
    pub roadmap_scale: RoadmapScale,
}

impl WorkingCopy {
    pub fn from_project(project: &Project) -> Self {
        Self {
            tasks: project.tasks.clone(),
            column_state: project.column_state,
            milestones: project.milestones.clone(),
            roadmap_scale: project.roadmap_scale,
        }
    }

    /// Write this working copy back into `project`
    pub fn store_into(&self, project: &mut Project) {
        project.tasks = self.tasks.clone();
        project.column_state = self.column_state;
        project.milestones = self.milestones.clone();
        project.roadmap_scale = self.roadmap_scale;
    }
}

fn iso_offset(today: NaiveDate, days: i64) -> Option<String> {
    Some((today + Duration::days(days)).format("%Y-%m-%d").to_string())
}

/// Example cards shown in the demo project and restored by "reset"
pub fn sample_tasks(today: NaiveDate) -> Vec<Task> {
    vec![
        Task::new(
            "1",
            "Impostare repository su GitHub",
            "Creare repo, abilitare GitHub Pages (branch main).",
            Status::Done,
            iso_offset(today, -1),
        ),
        Task::new(
            "2",
            "Definire colonne Kanban",
            "Da fare / In corso / Pending / Completato",
            Status::InProgress,
            iso_offset(today, 1),
        ),
        Task::new(
            "3",
            "Gestire attività bloccate",
            "Usare la colonna Pending per le attività bloccate.",
            Status::Pending,
            iso_offset(today, 2),
        ),
        Task::new(
            "4",
            "Rifinire stile Office 365",
            "Colori, font, spacing coerenti.",
            Status::Todo,
            iso_offset(today, 3),
        ),
    ]
}

/// Milestones seeded into the demo project
pub fn seed_milestones(today: NaiveDate) -> Vec<Milestone> {
    let date = |days: i64| (today + Duration::days(days)).format("%Y-%m-%d").to_string();
    vec![
        Milestone::new("m1", "Kickoff", date(7), "Avvio del progetto con il team."),
        Milestone::new("m2", "Prima release", date(45), "Prima versione pubblicata."),
    ]
}

/// Local calendar date used for "today" everywhere in the app
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Derive a project id from a name: lower-case, whitespace runs to "-",
/// anything outside [a-z0-9-] dropped
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }
    slug
}
