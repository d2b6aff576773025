//! Plain-text rendering of the board for the command line.

use crate::domain::{
    day_label, status_label, ColumnState, Milestone, Project, RoadmapScale, Status, Task,
};
use crate::roadmap::{RoadmapView, TimelineGroup};
use indexmap::IndexMap;

pub const EMPTY_ROADMAP: &str = "Nessuna milestone con data valida da mostrare nella roadmap.";
pub const EMPTY_TIMELINE: &str = "Nessuna attività con data di scadenza valida da mostrare in timeline.";

/// Board columns in order; collapsed columns only show their count
pub fn render_board(columns: &[(Status, Vec<&Task>)], state: &ColumnState, compact: bool) -> String {
    let mut out = String::new();

    for (status, tasks) in columns {
        let marker = if state.is_collapsed(*status) { "+" } else { "-" };
        out.push_str(&format!("{} {} ({})\n", marker, status_label(*status), tasks.len()));
        if state.is_collapsed(*status) {
            continue;
        }
        for task in tasks {
            out.push_str(&render_task_line(task));
            if !compact && !task.description.is_empty() {
                out.push_str(&format!("      {}\n", task.description));
            }
        }
    }
    out
}

fn render_task_line(task: &Task) -> String {
    match task.due_date.as_deref() {
        Some(due) => format!("    [{}] {} (scadenza {})\n", task.id, task.title, due),
        None => format!("    [{}] {}\n", task.id, task.title),
    }
}

/// Project list with the current one marked
pub fn render_projects(projects: &IndexMap<String, Project>, current: &str) -> String {
    projects
        .values()
        .map(|p| {
            let marker = if p.id == current { "*" } else { " " };
            format!("{} {} ({}) - {} attività\n", marker, p.display_name(), p.id, p.tasks.len())
        })
        .collect()
}

pub fn render_milestones(milestones: &[Milestone]) -> String {
    milestones
        .iter()
        .map(|m| {
            if m.description.is_empty() {
                format!("[{}] {} {}\n", m.id, m.date, m.title)
            } else {
                format!("[{}] {} {} - {}\n", m.id, m.date, m.title, m.description)
            }
        })
        .collect()
}

/// Header row of cell labels, then one block per cell with its milestones
pub fn render_roadmap(view: &RoadmapView) -> String {
    if view.is_empty() {
        return format!("{}\n", EMPTY_ROADMAP);
    }

    let mut out = String::new();
    let header: Vec<String> = view
        .header_row()
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            if view.today_index == Some(i) {
                format!("[{}]", label)
            } else {
                label.to_string()
            }
        })
        .collect();
    out.push_str(&header.join(" | "));
    out.push('\n');

    for (cell, milestones) in view.cells.iter().zip(view.milestone_row()) {
        if milestones.is_empty() {
            continue;
        }
        // Weeks also show their day range
        let mut heading = match view.scale {
            RoadmapScale::Weeks => format!(
                "{} ({} - {})",
                cell.label,
                day_label(cell.start),
                day_label(cell.end)
            ),
            RoadmapScale::Months | RoadmapScale::Quarters => cell.label.clone(),
        };
        if cell.is_today {
            heading.push_str(" (oggi)");
        }
        out.push_str(&format!("{}:\n", heading));
        for m in milestones {
            out.push_str(&format!("  ◆ {} ({})\n", m.title, m.date));
        }
    }
    out
}

pub fn render_timeline(groups: &[TimelineGroup]) -> String {
    if groups.is_empty() {
        return format!("{}\n", EMPTY_TIMELINE);
    }

    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("● {}\n", group.label));
        for task in &group.tasks {
            out.push_str(&format!("    {} · {}\n", task.title, status_label(task.status)));
        }
    }
    out
}
