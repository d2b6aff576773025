use super::normalize::normalize_with_id;
use crate::domain::Project;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Everything stored under the projects slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub projects: IndexMap<String, Project>,
    pub current_project_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadRef<'a> {
    projects: &'a IndexMap<String, Project>,
    current_project_id: &'a str,
}

/// Decode a stored payload.
///
/// Returns `Ok(None)` when the payload has no projects; a stale or missing
/// `currentProjectId` falls back to the first project.
pub fn decode_payload(raw: &str) -> Result<Option<Payload>> {
    let parsed: Value = serde_json::from_str(raw).context("Stored payload is not valid JSON")?;

    let projects_raw = match parsed.get("projects") {
        Some(Value::Object(map)) if !map.is_empty() => map,
        _ => return Ok(None),
    };

    let projects: IndexMap<String, Project> = projects_raw
        .iter()
        .map(|(id, raw)| (id.clone(), normalize_with_id(Some(id.as_str()), raw)))
        .collect();

    let current_project_id = parsed
        .get("currentProjectId")
        .and_then(Value::as_str)
        .filter(|id| projects.contains_key(*id))
        .map(str::to_string)
        .or_else(|| projects.keys().next().cloned())
        .context("Payload has no projects")?;

    Ok(Some(Payload {
        projects,
        current_project_id,
    }))
}

/// Encode the payload as compact JSON
pub fn encode_payload(projects: &IndexMap<String, Project>, current_project_id: &str) -> Result<String> {
    let payload = PayloadRef {
        projects,
        current_project_id,
    };
    serde_json::to_string(&payload).context("Failed to serialize projects")
}
