//! Error type shared by the scheduler, the stores and the import/export code.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Quality outside the Hard/Good/Easy set. The reviewer should be re-prompted.
    #[error("invalid quality {0}: expected 1 (hard), 3 (good) or 5 (easy)")]
    InvalidQuality(i32),

    /// No review card for this item. The caller should refresh its due set.
    #[error("review card not found: {0}")]
    NotFound(i64),

    #[error("language not found: {0}")]
    LanguageNotFound(i64),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("corrupt app state: {0}")]
    CorruptState(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
