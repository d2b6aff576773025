/// User-visible failures of board operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid import: expected an exported project (with 'tasks') or an array of tasks")]
    InvalidImportFormat,
    #[error("invalid date: {0:?}")]
    InvalidDate(String),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("cannot delete the only remaining project")]
    LastProject,
}
