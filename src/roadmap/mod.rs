pub mod bucket;
pub mod layout;
pub mod timeline;

pub use layout::{plan_roadmap, RoadmapView};
pub use timeline::{plan_timeline, TimelineGroup};
