//! JSON import/export for a language's vocabulary.
//! Only content is exported; imported items start with fresh review cards.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::models::{Language, NewLanguage, NewVocabulary, VocabularyItem};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportedLanguage {
    pub name: String,
    pub code: String,
    pub flag_emoji: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportedWord {
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty_level: i32,
}

fn default_difficulty() -> i32 {
    1
}

/// File layout of an exported language.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LanguageExport {
    pub language: ExportedLanguage,
    pub vocabulary: Vec<ExportedWord>,
}

impl LanguageExport {
    fn new(language: &Language, vocabulary: Vec<VocabularyItem>) -> Self {
        Self {
            language: ExportedLanguage {
                name: language.name.clone(),
                code: language.code.clone(),
                flag_emoji: language.flag_emoji.clone(),
            },
            vocabulary: vocabulary
                .into_iter()
                .map(|item| ExportedWord {
                    word: item.word,
                    translation: item.translation,
                    pronunciation: item.pronunciation,
                    example_sentence: item.example_sentence,
                    difficulty_level: item.difficulty_level,
                })
                .collect(),
        }
    }
}

/// Exports a language and its vocabulary to a JSON file at the specified path.
pub fn export_language_to_path(
    db: &Database,
    language_id: i64,
    path: impl AsRef<Path>,
) -> Result<LanguageExport> {
    let language = db
        .get_language(language_id)?
        .ok_or(Error::LanguageNotFound(language_id))?;
    let vocabulary = db.get_vocabulary_by_language(language_id)?;
    let export = LanguageExport::new(&language, vocabulary);

    let json_string = serde_json::to_string_pretty(&export)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;

    info!(
        "Exported {} word(s) of '{}' to '{}'",
        export.vocabulary.len(),
        language.name,
        path.as_ref().display()
    );
    Ok(export)
}

/// Imports a language file.
///
/// A language with the same code is reused, otherwise it is created. Every word
/// becomes a new vocabulary item with a card that is due immediately. The whole
/// file is written in one transaction, so an invalid entry leaves the database
/// untouched. Returns the language and the number of words imported.
pub fn import_language(db: &Database, path: impl AsRef<Path>) -> Result<(Language, usize)> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let export: LanguageExport = serde_json::from_str(&contents)?;

    let words = export
        .vocabulary
        .into_iter()
        .map(|word| NewVocabulary {
            language_id: 0,
            word: word.word,
            translation: word.translation,
            pronunciation: word.pronunciation,
            example_sentence: word.example_sentence,
            difficulty_level: word.difficulty_level,
        })
        .collect();

    let (language, imported) = db.import_vocabulary(
        NewLanguage {
            name: export.language.name,
            code: export.language.code,
            flag_emoji: export.language.flag_emoji,
        },
        words,
    )?;

    info!(
        "Imported {} word(s) into '{}' from '{}'",
        imported,
        language.name,
        path.as_ref().display()
    );
    Ok((language, imported))
}
