pub mod repository;
pub mod search;

pub use repository::ArchiveOutcome;
pub use search::matches_search;

use crate::domain::{
    slugify, today, ColumnState, Milestone, Project, RoadmapScale, Task, WorkingCopy,
};
use crate::error::BoardError;
use crate::persistence::{
    decode_payload, encode_payload, load_compact_view, normalize, normalize_tasks,
    save_compact_view, Backend, Payload, PROJECTS_KEY,
};
use crate::roadmap::{plan_roadmap, plan_timeline, RoadmapView, TimelineGroup};
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use serde_json::Value;

const DEFAULT_PROJECT_SLUG: &str = "progetto";
const IMPORTED_PROJECT_SLUG: &str = "progetto-importato";
const IMPORTED_PROJECT_NAME: &str = "Progetto importato";

/// Transient per-session state, reset on every project switch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Task currently open in the edit form
    pub editing_task_id: Option<String>,
    pub search_term: String,
}

/// Result of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// A whole project was added and made current
    Project { id: String, name: String },
    /// The current project's tasks were replaced
    Tasks { count: usize },
}

/// All projects, the current-project pointer and its working copy
pub struct ProjectStore<B: Backend> {
    backend: B,
    projects: IndexMap<String, Project>,
    current_project_id: String,
    working: WorkingCopy,
    session: Session,
}

impl<B: Backend> ProjectStore<B> {
    /// Load from `backend`, falling back to the demo project
    pub fn load(backend: B) -> Self {
        Self::load_at(backend, today())
    }

    /// Load with an explicit "today" (used for the demo project's dates)
    pub fn load_at(backend: B, today: NaiveDate) -> Self {
        match read_payload(&backend) {
            Some(Payload {
                projects,
                current_project_id,
            }) => {
                tracing::debug!(
                    projects = projects.len(),
                    current = %current_project_id,
                    "loaded board"
                );
                let working = WorkingCopy::from_project(&projects[current_project_id.as_str()]);
                Self {
                    backend,
                    projects,
                    current_project_id,
                    working,
                    session: Session::default(),
                }
            }
            None => {
                let demo = Project::demo(today);
                let id = demo.id.clone();
                let working = WorkingCopy::from_project(&demo);
                let mut projects = IndexMap::new();
                projects.insert(id.clone(), demo);

                let mut store = Self {
                    backend,
                    projects,
                    current_project_id: id,
                    working,
                    session: Session::default(),
                };
                tracing::debug!("no saved board, created demo project");
                store.save();
                store
            }
        }
    }

    /// Write the working copy back and persist the whole payload.
    ///
    /// Write failures are logged; the in-memory state stays authoritative.
    pub fn save(&mut self) {
        let id = self.current_project_id.clone();
        let project = self
            .projects
            .entry(id.clone())
            .or_insert_with(|| Project::empty(id.clone(), format!("Project {}", id)));
        self.working.store_into(project);

        let encoded = match encode_payload(&self.projects, &self.current_project_id) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode projects");
                return;
            }
        };
        if let Err(e) = self.backend.write(PROJECTS_KEY, &encoded) {
            tracing::warn!(error = %e, "could not save projects");
        }
    }

    /// Make `id` the current project. Unknown or already-current ids are ignored.
    pub fn switch_to(&mut self, id: &str) -> bool {
        if id == self.current_project_id || !self.projects.contains_key(id) {
            return false;
        }
        self.save();
        self.adopt(id.to_string());
        self.save();
        tracing::debug!(project = %id, "switched project");
        true
    }

    /// Create an empty project named `name` and switch to it
    pub fn create_project(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = self.unique_project_id(&slugify(name), DEFAULT_PROJECT_SLUG);
        self.save();
        self.projects.insert(id.clone(), Project::empty(id.clone(), name));
        self.adopt(id.clone());
        self.save();
        Some(id)
    }

    /// Rename the current project; blank names are ignored
    pub fn rename_current(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if let Some(project) = self.projects.get_mut(&self.current_project_id) {
            project.name = name.to_string();
        }
        self.save();
        true
    }

    /// Delete the current project and move to the first remaining one
    pub fn delete_current(&mut self) -> Result<(), BoardError> {
        if self.projects.len() <= 1 {
            return Err(BoardError::LastProject);
        }

        self.projects.shift_remove(&self.current_project_id);
        let next = self
            .projects
            .keys()
            .next()
            .cloned()
            .ok_or(BoardError::LastProject)?;
        self.adopt(next);
        self.save();
        Ok(())
    }

    /// The current project as pretty-printed JSON
    pub fn export_current(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string_pretty(&self.current_project())?)
    }

    /// Suggested file name for an export, e.g. "kanban-mio-progetto.json"
    pub fn export_file_name(&self) -> String {
        let project = self.current_project();
        let slug = slugify(project.display_name());
        let slug = if slug.is_empty() { DEFAULT_PROJECT_SLUG } else { slug.as_str() };
        format!("kanban-{}.json", slug)
    }

    /// Import a project export or a bare array of tasks.
    ///
    /// Nothing changes when the text is rejected.
    pub fn import_project(&mut self, text: &str) -> Result<ImportOutcome, BoardError> {
        let parsed: Value = serde_json::from_str(text)?;

        match &parsed {
            Value::Object(obj) if matches!(obj.get("tasks"), Some(Value::Array(_))) => {
                let raw_id = obj
                    .get("id")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty());
                let name = obj
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .or(raw_id)
                    .unwrap_or(IMPORTED_PROJECT_NAME)
                    .to_string();

                let base = slugify(raw_id.unwrap_or(&name));
                let id = self.unique_project_id(&base, IMPORTED_PROJECT_SLUG);

                let mut project = normalize(&parsed);
                project.id = id.clone();
                project.name = name.clone();

                self.save();
                self.projects.insert(id.clone(), project);
                self.adopt(id.clone());
                self.save();
                tracing::debug!(project = %id, "imported project");
                Ok(ImportOutcome::Project { id, name })
            }
            Value::Array(items) => {
                self.working = WorkingCopy {
                    tasks: normalize_tasks(items),
                    ..WorkingCopy::default()
                };
                self.session = Session::default();
                self.save();
                Ok(ImportOutcome::Tasks {
                    count: self.working.tasks.len(),
                })
            }
            _ => Err(BoardError::InvalidImportFormat),
        }
    }

    /// Toggle the compact display preference (stored in its own slot)
    pub fn set_compact_view(&mut self, compact: bool) {
        save_compact_view(&mut self.backend, compact);
    }

    pub fn compact_view(&self) -> bool {
        load_compact_view(&self.backend)
    }

    // ---- read accessors ----

    pub fn projects(&self) -> &IndexMap<String, Project> {
        &self.projects
    }

    pub fn current_project_id(&self) -> &str {
        &self.current_project_id
    }

    /// The current project with the working copy applied
    pub fn current_project(&self) -> Project {
        let mut project = self
            .projects
            .get(&self.current_project_id)
            .cloned()
            .unwrap_or_else(|| {
                Project::empty(
                    self.current_project_id.clone(),
                    format!("Project {}", self.current_project_id),
                )
            });
        self.working.store_into(&mut project);
        project
    }

    pub fn tasks(&self) -> &[Task] {
        &self.working.tasks
    }

    pub fn column_state(&self) -> &ColumnState {
        &self.working.column_state
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.working.milestones
    }

    pub fn roadmap_scale(&self) -> RoadmapScale {
        self.working.roadmap_scale
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Roadmap render model for the current project
    pub fn roadmap(&self, today: NaiveDate) -> RoadmapView {
        plan_roadmap(self.working.roadmap_scale, &self.working.milestones, today)
    }

    /// Tasks with a due date, grouped by day, honoring the search term
    pub fn timeline(&self) -> Vec<TimelineGroup> {
        plan_timeline(&self.working.tasks, &self.session.search_term)
    }

    // ---- internals ----

    /// Point the store at `id` and seed the working copy from it
    fn adopt(&mut self, id: String) {
        self.working = self
            .projects
            .get(&id)
            .map(WorkingCopy::from_project)
            .unwrap_or_default();
        self.current_project_id = id;
        self.session = Session::default();
    }

    /// `base`, or `base-1`, `base-2`, ... whichever is free
    fn unique_project_id(&self, base: &str, fallback: &str) -> String {
        let base = if base.is_empty() { fallback } else { base };
        let mut id = base.to_string();
        let mut suffix = 1;
        while self.projects.contains_key(&id) {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        id
    }
}

fn read_payload<B: Backend>(backend: &B) -> Option<Payload> {
    let raw = match backend.read(PROJECTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved projects");
            return None;
        }
    };
    match decode_payload(&raw) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "saved projects are corrupt, starting from the demo project");
            None
        }
    }
}

/// Time-based id (`prefix` + milliseconds), bumped until `taken` says it is free
pub(crate) fn fresh_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let id = format!("{}{}", prefix, stamp);
        if !taken(&id) {
            return id;
        }
        stamp += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;
    use crate::persistence::MemoryBackend;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn fresh_store() -> ProjectStore<MemoryBackend> {
        ProjectStore::load_at(MemoryBackend::new(), day())
    }

    fn saved(store: &ProjectStore<MemoryBackend>) -> Payload {
        let raw = store.backend().slot(PROJECTS_KEY).unwrap();
        decode_payload(raw).unwrap().unwrap()
    }

    #[test]
    fn test_fresh_store_creates_demo_project() {
        let store = fresh_store();

        assert_eq!(store.projects().len(), 1);
        let project = store.current_project();
        assert_eq!(project.name, "Progetto demo");
        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        let statuses: Vec<Status> = store.tasks().iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![Status::Done, Status::InProgress, Status::Pending, Status::Todo]
        );
        let milestone_ids: Vec<&str> = store.milestones().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(milestone_ids, vec!["m1", "m2"]);
        assert_eq!(store.roadmap_scale(), RoadmapScale::Months);

        // Persisted right away
        let payload = saved(&store);
        assert_eq!(payload.current_project_id, "default");
        assert_eq!(payload.projects["default"].tasks.len(), 4);
    }

    #[test]
    fn test_corrupt_payload_falls_back_to_demo() {
        let backend = MemoryBackend::with_slot(PROJECTS_KEY, "{ not json");
        let store = ProjectStore::load_at(backend, day());
        assert_eq!(store.current_project().name, "Progetto demo");
        assert!(saved(&store).projects.contains_key("default"));
    }

    #[test]
    fn test_empty_projects_fall_back_to_demo() {
        let backend = MemoryBackend::with_slot(PROJECTS_KEY, r#"{"projects":{},"currentProjectId":"x"}"#);
        let store = ProjectStore::load_at(backend, day());
        assert_eq!(store.current_project_id(), "default");
    }

    #[test]
    fn test_load_migrates_legacy_projects() {
        let raw = r#"{
            "projects": {
                "work": {"id": "work", "name": "Work", "tasks": [{"id": "1", "title": "A", "status": "todo"}], "columnState": {"done": false}},
                "home": {"id": "home", "name": "Home", "tasks": []}
            },
            "currentProjectId": "home"
        }"#;
        let mut store = ProjectStore::load_at(MemoryBackend::with_slot(PROJECTS_KEY, raw), day());

        assert_eq!(store.current_project_id(), "home");
        assert_eq!(store.column_state(), &ColumnState::default());
        assert!(store.switch_to("work"));
        assert_eq!(store.tasks().len(), 1);
        assert!(!store.column_state().done);
        assert!(store.milestones().is_empty());
        assert_eq!(store.roadmap_scale(), RoadmapScale::Months);
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let mut store = fresh_store();
        store.create_project("Second");
        store.add_task("Persist me", "", None, Status::Pending);

        let backend = store.backend().clone();
        let reloaded = ProjectStore::load_at(backend, day());
        assert_eq!(reloaded.current_project_id(), "second");
        assert_eq!(reloaded.tasks().len(), 1);
        assert_eq!(reloaded.tasks()[0].title, "Persist me");
        assert_eq!(reloaded.projects().len(), 2);
    }

    #[test]
    fn test_save_recreates_missing_current_entry() {
        let mut store = fresh_store();
        store.projects.shift_remove("default");
        store.save();

        let project = &saved(&store).projects["default"];
        assert_eq!(project.name, "Project default");
        assert_eq!(project.tasks.len(), 4);
    }

    #[test]
    fn test_failed_writes_keep_memory_state() {
        let mut store = fresh_store();
        store.backend_mut().fail_writes = true;

        let id = store.add_task("Only in memory", "", None, Status::Todo);
        assert!(id.is_some());
        assert_eq!(store.tasks().len(), 5);
        // Last successful write still has the demo tasks
        assert_eq!(saved(&store).projects["default"].tasks.len(), 4);
    }

    #[test]
    fn test_switch_to_ignores_unknown_and_current() {
        let mut store = fresh_store();
        assert!(!store.switch_to("nope"));
        assert!(!store.switch_to("default"));
        assert_eq!(store.current_project_id(), "default");
    }

    #[test]
    fn test_switch_saves_working_copy_and_resets_session() {
        let mut store = fresh_store();
        store.create_project("Other");
        assert!(store.switch_to("default"));

        store.set_search_term("demo");
        store.begin_edit("2");
        store.move_task("1", Some(Status::Todo));

        assert!(store.switch_to("other"));
        assert_eq!(store.session(), &Session::default());
        assert!(store.tasks().is_empty());
        assert_eq!(store.projects()["default"].tasks[0].status, Status::Todo);
        assert_eq!(saved(&store).current_project_id, "other");
    }

    #[test]
    fn test_create_project_slug_and_collisions() {
        let mut store = fresh_store();
        assert_eq!(store.create_project("Mio Progetto!").as_deref(), Some("mio-progetto"));
        assert_eq!(store.create_project("mio progetto").as_deref(), Some("mio-progetto-1"));
        assert_eq!(store.create_project("Mio   Progetto").as_deref(), Some("mio-progetto-2"));
        assert_eq!(store.create_project("???").as_deref(), Some("progetto"));
        assert_eq!(store.create_project("   "), None);

        assert_eq!(store.current_project_id(), "progetto");
        let created = &store.projects()["mio-progetto"];
        assert_eq!(created.name, "Mio Progetto!");
        assert!(created.tasks.is_empty());
        assert!(created.milestones.is_empty());
        assert_eq!(created.column_state, ColumnState::default());
        assert_eq!(created.roadmap_scale, RoadmapScale::Months);
    }

    #[test]
    fn test_rename_current() {
        let mut store = fresh_store();
        assert!(!store.rename_current("  "));
        assert!(store.rename_current("  Nuovo nome "));
        assert_eq!(store.current_project().name, "Nuovo nome");
        assert_eq!(saved(&store).projects["default"].name, "Nuovo nome");
    }

    #[test]
    fn test_delete_last_project_rejected() {
        let mut store = fresh_store();
        let before = store.projects().clone();

        assert!(matches!(store.delete_current(), Err(BoardError::LastProject)));
        assert_eq!(store.projects(), &before);
        assert_eq!(store.current_project_id(), "default");
    }

    #[test]
    fn test_delete_current_adopts_first_remaining() {
        let mut store = fresh_store();
        store.create_project("A");
        store.create_project("B");

        store.delete_current().unwrap();
        assert_eq!(store.current_project_id(), "default");
        assert_eq!(store.tasks().len(), 4);
        assert!(!store.projects().contains_key("b"));
        assert!(!saved(&store).projects.contains_key("b"));
    }

    #[test]
    fn test_reload_keeps_project_order() {
        let mut store = fresh_store();
        store.create_project("Zeta");
        store.create_project("Alpha");

        let mut reloaded = ProjectStore::load_at(store.backend().clone(), day());
        let keys: Vec<&str> = reloaded.projects().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["default", "zeta", "alpha"]);
        assert_eq!(reloaded.current_project_id(), "alpha");

        reloaded.delete_current().unwrap();
        assert_eq!(reloaded.current_project_id(), "default");
        assert_eq!(reloaded.tasks().len(), 4);
    }

    #[test]
    fn test_export_current_is_pretty_project() {
        let mut store = fresh_store();
        store.set_roadmap_scale(RoadmapScale::Weeks);
        let exported = store.export_current().unwrap();

        assert!(exported.contains('\n'));
        let value: Value = serde_json::from_str(&exported).unwrap();
        assert_eq!(value["id"], "default");
        assert_eq!(value["roadmapScale"], "weeks");
        assert_eq!(value["tasks"].as_array().unwrap().len(), 4);
        assert_eq!(value["columnState"]["done"], true);
        assert_eq!(store.export_file_name(), "kanban-progetto-demo.json");
    }

    #[test]
    fn test_export_then_import_copies_project() {
        let mut store = fresh_store();
        let exported = store.export_current().unwrap();

        let outcome = store.import_project(&exported).unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::Project {
                id: "default-1".into(),
                name: "Progetto demo".into()
            }
        );
        let mut original = store.projects()["default"].clone();
        original.id = "default-1".into();
        assert_eq!(store.current_project(), original);
    }

    #[test]
    fn test_import_anonymous_project() {
        let mut store = fresh_store();
        let text = r#"{"tasks":[{"id":"9","title":"X","status":"todo"}]}"#;

        let outcome = store.import_project(text).unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::Project {
                id: "progetto-importato".into(),
                name: "Progetto importato".into()
            }
        );
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].id, "9");

        let again = store.import_project(text).unwrap();
        assert!(matches!(again, ImportOutcome::Project { ref id, .. } if id == "progetto-importato-1"));
    }

    #[test]
    fn test_import_fills_missing_ids_without_clashes() {
        let mut store = fresh_store();
        let text = r#"{"name":"D","tasks":[{"id":"2","title":"A"},{"title":"B"}]}"#;

        store.import_project(text).unwrap();
        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        assert!(store.move_task("3", Some(Status::Done)));
        assert_eq!(store.tasks()[0].status, Status::Todo);
        assert!(store.delete_task("2"));
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_import_task_array_replaces_current_tasks() {
        let mut store = fresh_store();
        store.set_roadmap_scale(RoadmapScale::Quarters);
        store.toggle_column(Status::Todo);

        let outcome = store
            .import_project(r#"[{"id":"a","title":"One","status":"done"},{"id":"b","title":"Two"}]"#)
            .unwrap();
        assert_eq!(outcome, ImportOutcome::Tasks { count: 2 });
        assert_eq!(store.current_project_id(), "default");
        assert_eq!(store.tasks().len(), 2);
        assert!(store.milestones().is_empty());
        assert_eq!(store.column_state(), &ColumnState::default());
        assert_eq!(store.roadmap_scale(), RoadmapScale::Months);
        assert_eq!(saved(&store).projects["default"].tasks.len(), 2);
    }

    #[test]
    fn test_import_rejects_other_shapes_without_mutation() {
        let mut store = fresh_store();
        let before = store.current_project();

        assert!(matches!(store.import_project("{nope"), Err(BoardError::InvalidJson(_))));
        assert!(matches!(
            store.import_project(r#"{"name":"x","tasks":"no"}"#),
            Err(BoardError::InvalidImportFormat)
        ));
        assert!(matches!(store.import_project("42"), Err(BoardError::InvalidImportFormat)));
        assert_eq!(store.current_project(), before);
        assert_eq!(store.projects().len(), 1);
    }

    #[test]
    fn test_compact_view_is_separate_slot() {
        let mut store = fresh_store();
        assert!(!store.compact_view());
        store.set_compact_view(true);
        assert!(store.compact_view());
        assert!(!store.backend().slot(PROJECTS_KEY).unwrap().contains("compact"));
    }

    #[test]
    fn test_roadmap_uses_working_copy() {
        let mut store = fresh_store();
        let view = store.roadmap(day());
        assert!(!view.is_empty());
        assert!(view.today_index.is_some());

        store.set_roadmap_scale(RoadmapScale::Quarters);
        assert_eq!(store.roadmap(day()).header_row(), vec!["Q1 2024", "Q2 2024"]);
    }

    #[test]
    fn test_fresh_id_skips_taken() {
        let first = fresh_id("m", |_| false);
        let second = fresh_id("m", |id| id == first);
        assert!(first.starts_with('m'));
        assert_ne!(first, second);
    }
}
