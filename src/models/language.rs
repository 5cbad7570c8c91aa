//! Language is the category that owns vocabulary items
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub flag_emoji: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewLanguage {
    pub name: String,
    pub code: String,
    pub flag_emoji: String,
}

impl NewLanguage {
    pub fn new(name: &str, code: &str, flag_emoji: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
            flag_emoji: flag_emoji.to_string(),
        }
    }
}
