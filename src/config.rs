//! Runtime configuration for the review application.
use crate::scheduler::DEFAULT_REVIEW_LIMIT;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "db.sqlite3";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// SQLite file holding languages, vocabulary and review cards.
    pub database_path: PathBuf,
    /// Maximum number of cards fetched or reviewed in one go.
    pub review_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            review_limit: DEFAULT_REVIEW_LIMIT,
        }
    }
}

impl Config {
    /// Fills unset values from the defaults.
    pub fn new(database_path: Option<PathBuf>, review_limit: Option<usize>) -> Self {
        let defaults = Self::default();
        Self {
            database_path: database_path.unwrap_or(defaults.database_path),
            review_limit: review_limit.unwrap_or(defaults.review_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(None, None);
        assert_eq!(config.database_path, PathBuf::from("db.sqlite3"));
        assert_eq!(config.review_limit, 20);
    }

    #[test]
    fn test_overrides() {
        let config = Config::new(Some(PathBuf::from("/tmp/words.db")), Some(5));
        assert_eq!(config.database_path, PathBuf::from("/tmp/words.db"));
        assert_eq!(config.review_limit, 5);
    }
}
