//! Repair of raw project records.
//!
//! Saved boards come from several schema vintages: early ones have no
//! `milestones` or `roadmapScale`, hand-edited or imported files may miss
//! anything else. Every record goes through [`normalize`] before it is
//! trusted, and the result always satisfies the [`Project`] invariants.
//! Nothing here fails; malformed input is replaced by defaults.

use crate::domain::{ColumnState, Milestone, Project, RoadmapScale, Status, Task};
use serde_json::{Map, Value};
use std::collections::HashSet;

const UNTITLED: &str = "Senza titolo";

/// Normalize a raw record, taking its id from the record itself
pub fn normalize(raw: &Value) -> Project {
    normalize_with_id(None, raw)
}

/// Normalize a raw record; `id` (the map key) wins over the record's own id
pub fn normalize_with_id(id: Option<&str>, raw: &Value) -> Project {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let id = id
        .map(str::to_string)
        .or_else(|| obj.get("id").and_then(scalar_string))
        .unwrap_or_default();

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| id.clone());

    let tasks = match obj.get("tasks") {
        Some(Value::Array(items)) => normalize_tasks(items),
        _ => Vec::new(),
    };

    let milestones = match obj.get("milestones") {
        Some(Value::Array(items)) => {
            let records = records(items);
            let ids = unique_ids(&records, |n| format!("m{}", n));
            records
                .into_iter()
                .zip(ids)
                .map(|((_, obj), id)| normalize_milestone(id, obj))
                .collect()
        }
        _ => Vec::new(),
    };

    let roadmap_scale = obj
        .get("roadmapScale")
        .and_then(Value::as_str)
        .and_then(RoadmapScale::from_key)
        .unwrap_or_default();

    Project {
        id,
        name,
        tasks,
        column_state: ensure_column_state_defaults(obj.get("columnState")),
        milestones,
        roadmap_scale,
    }
}

/// Normalize a bare array of task records; non-object entries are dropped
pub fn normalize_tasks(items: &[Value]) -> Vec<Task> {
    let records = records(items);
    let ids = unique_ids(&records, |n| n.to_string());
    records
        .into_iter()
        .zip(ids)
        .map(|((_, obj), id)| normalize_task(id, obj))
        .collect()
}

/// Fill in every missing column key: `done` collapsed, the rest expanded.
/// Present keys keep their (truthy) value, unknown keys are ignored.
pub fn ensure_column_state_defaults(raw: Option<&Value>) -> ColumnState {
    let defaults = ColumnState::default();
    let obj = match raw {
        Some(Value::Object(obj)) => obj,
        _ => return defaults,
    };

    let mut state = defaults;
    for &status in Status::all() {
        if let Some(value) = obj.get(status.key()) {
            state.set_collapsed(status, truthy(value));
        }
    }
    state
}

/// Object entries with their position in the source array
fn records(items: &[Value]) -> Vec<(usize, &Map<String, Value>)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| item.as_object().map(|obj| (i, obj)))
        .collect()
}

/// One id per record, unique within the list.
///
/// A record keeps its own id unless an earlier record already claimed it.
/// Missing or repeated ids become `fallback(n)` for the first `n` from the
/// record's 1-based position that no record uses.
fn unique_ids(
    records: &[(usize, &Map<String, Value>)],
    fallback: impl Fn(usize) -> String,
) -> Vec<String> {
    let own: Vec<Option<String>> = records
        .iter()
        .map(|(_, obj)| obj.get("id").and_then(scalar_string).filter(|id| !id.is_empty()))
        .collect();
    let mut taken: HashSet<String> = own.iter().flatten().cloned().collect();
    let mut claimed: HashSet<String> = HashSet::new();

    records
        .iter()
        .zip(own)
        .map(|((index, _), id)| {
            if let Some(id) = id {
                if claimed.insert(id.clone()) {
                    return id;
                }
            }
            let mut n = index + 1;
            let mut candidate = fallback(n);
            while taken.contains(&candidate) {
                n += 1;
                candidate = fallback(n);
            }
            taken.insert(candidate.clone());
            claimed.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn normalize_task(id: String, obj: &Map<String, Value>) -> Task {
    let status = obj
        .get("status")
        .and_then(Value::as_str)
        .and_then(Status::from_key)
        .unwrap_or_default();

    let due_date = obj
        .get("dueDate")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Task {
        id,
        title: title_of(obj),
        description: string_field(obj, "description"),
        status,
        due_date,
    }
}

fn normalize_milestone(id: String, obj: &Map<String, Value>) -> Milestone {
    Milestone {
        id,
        title: title_of(obj),
        description: string_field(obj, "description"),
        date: string_field(obj, "date"),
    }
}

fn title_of(obj: &Map<String, Value>) -> String {
    let title = string_field(obj, "title");
    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Ids may have been written as numbers by older exports
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
