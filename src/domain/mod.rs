pub mod enums;
pub mod locale;
pub mod milestone;
pub mod project;
pub mod task;

pub use enums::{RoadmapScale, Status};
pub use locale::{day_label, month_label, status_label};
pub use milestone::{parse_date, Milestone};
pub use project::{sample_tasks, slugify, today, ColumnState, Project, WorkingCopy};
pub use task::{clean_due_date, Task, TaskPatch};
