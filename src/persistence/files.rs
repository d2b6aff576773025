use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DIR_NAME: &str = ".kanban";

/// Get the board directory - checks for local .kanban first, then falls back to global ~/.kanban
pub fn get_kanban_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_kanban(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DIR_NAME))
}

/// Find local .kanban directory by walking up the directory tree
fn find_local_kanban(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let kanban_dir = current.join(DIR_NAME);
        if kanban_dir.is_dir() {
            return Some(kanban_dir);
        }
        current = current.parent()?;
    }
}

/// Ensure the given directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initialize a local .kanban directory in the current directory
pub fn init_local_kanban() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let kanban_dir = current_dir.join(DIR_NAME);

    if kanban_dir.exists() {
        anyhow::bail!("Board directory already exists: {}", kanban_dir.display());
    }

    fs::create_dir_all(&kanban_dir)
        .with_context(|| format!("Failed to create directory: {}", kanban_dir.display()))?;

    Ok(kanban_dir)
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().context("File path has no parent directory")?;

    let mut temp_file = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, `None` if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}
