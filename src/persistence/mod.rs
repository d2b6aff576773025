pub mod backend;
pub mod files;
pub mod normalize;
pub mod payload;
pub mod prefs;

pub use backend::{Backend, FileBackend, MemoryBackend, COMPACT_VIEW_KEY, PROJECTS_KEY};
pub use files::{ensure_dir, get_kanban_dir, init_local_kanban};
pub use normalize::{normalize, normalize_tasks, normalize_with_id};
pub use payload::{decode_payload, encode_payload, Payload};
pub use prefs::{load_compact_view, save_compact_view};
