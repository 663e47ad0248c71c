use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForumError {
    #[error("Can't find {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Parent post {0} does not exist in this thread")]
    InvalidParent(i64),

    #[error("Can't find {0}")]
    MissingReference(String),

    #[error("Can't find cursor post {0}")]
    UnknownCursor(i64),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForumError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

pub type ForumResult<T> = Result<T, ForumError>;
