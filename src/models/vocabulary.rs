//! A vocabulary item is a word of some language together with its translation.
//! The scheduler only reads items; scheduling state lives in `ReviewCard`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: i64,
    pub language_id: i64,
    pub word: String,
    pub translation: String,
    pub pronunciation: Option<String>,
    pub example_sentence: Option<String>,
    pub difficulty_level: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a vocabulary item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewVocabulary {
    pub language_id: i64,
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: i32,
}

fn default_difficulty() -> i32 {
    1
}

impl NewVocabulary {
    pub fn new(language_id: i64, word: &str, translation: &str) -> Self {
        Self {
            language_id,
            word: word.to_string(),
            translation: translation.to_string(),
            pronunciation: None,
            example_sentence: None,
            difficulty_level: default_difficulty(),
        }
    }
}
