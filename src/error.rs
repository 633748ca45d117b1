use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkilltrackError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for SkilltrackError {
    fn from(e: rusqlite::Error) -> Self {
        SkilltrackError::Storage(format!("SQLite error: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, SkilltrackError>;
