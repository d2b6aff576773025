use super::bucket::{assign_milestones, build_buckets, find_bucket};
use crate::domain::{Milestone, RoadmapScale};
use chrono::NaiveDate;

/// One column of the roadmap as the UI draws it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapCell {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Cell containing today; highlighted and scrolled into view
    pub is_today: bool,
    pub milestones: Vec<Milestone>,
}

/// Render model for the roadmap view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapView {
    pub scale: RoadmapScale,
    pub cells: Vec<RoadmapCell>,
    pub today_index: Option<usize>,
}

impl RoadmapView {
    /// No dated milestones: show the empty-state message instead
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Top display row: one label per cell
    pub fn header_row(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.label.as_str()).collect()
    }

    /// Bottom display row, parallel to the header
    pub fn milestone_row(&self) -> Vec<&[Milestone]> {
        self.cells.iter().map(|c| c.milestones.as_slice()).collect()
    }
}

/// Lay out `milestones` on cells of `scale`, marking the one containing `today`
pub fn plan_roadmap(scale: RoadmapScale, milestones: &[Milestone], today: NaiveDate) -> RoadmapView {
    let mut dated: Vec<(NaiveDate, &Milestone)> = milestones
        .iter()
        .filter_map(|m| m.day().map(|d| (d, m)))
        .collect();
    dated.sort_by_key(|(d, _)| *d);

    let dates: Vec<NaiveDate> = dated.iter().map(|(d, _)| *d).collect();
    let buckets = build_buckets(scale, &dates);

    let sorted: Vec<Milestone> = dated.into_iter().map(|(_, m)| m.clone()).collect();
    let assigned = assign_milestones(&buckets, &sorted);
    let today_index = find_bucket(&buckets, today);

    let cells = buckets
        .into_iter()
        .zip(assigned)
        .enumerate()
        .map(|(i, (bucket, members))| RoadmapCell {
            label: bucket.label,
            start: bucket.start,
            end: bucket.end,
            is_today: today_index == Some(i),
            milestones: members.into_iter().cloned().collect(),
        })
        .collect();

    RoadmapView {
        scale,
        cells,
        today_index,
    }
}
