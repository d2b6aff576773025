use super::files::{atomic_write, ensure_dir, read_file};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// Slot holding the `{projects, currentProjectId}` payload
pub const PROJECTS_KEY: &str = "kanbanProjects_v1";
/// Slot holding the compact-display flag ("1"/"0")
pub const COMPACT_VIEW_KEY: &str = "kanbanCompactView_v1";

/// Synchronous key-value storage with whole-value replacement per slot
pub trait Backend {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One JSON file per slot inside the board directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Backend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        read_file(self.slot_path(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        ensure_dir(&self.dir)?;
        atomic_write(self.slot_path(key), value)
    }
}

/// In-process backend, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
    /// When set, every write fails (simulates a full or unavailable store)
    pub fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut backend = Self::default();
        backend.slots.insert(key.to_string(), value.to_string());
        backend
    }

    #[cfg(test)]
    pub fn slot(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("storage unavailable for slot {}", key);
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
