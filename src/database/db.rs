//! SQLite storage for the vocabulary review application
//!
//! Handles database initialization, CRUD operations for languages and vocabulary,
//! and SM-2 review card persistence. Vocabulary content and scheduling state are kept
//! in separate tables joined by item id.

use crate::error::{Error, Result};
use crate::models::{
    Language, NewLanguage, NewVocabulary, ReviewCard, ReviewStats, VocabularyItem,
};
use crate::models::review_card::MATURE_INTERVAL_DAYS;
use crate::store::{CardStore, Clock, VocabularyStore};
use crate::validation;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

/// Converts a stored unix timestamp back into a UTC date-time.
fn from_timestamp(secs: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(column, secs))
}

const CARD_COLUMNS: &str =
    "item_id, ease_factor, interval_days, repetitions, next_review, last_reviewed";

fn card_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewCard> {
    let last_reviewed: Option<i64> = row.get(5)?;
    Ok(ReviewCard {
        item_id: row.get(0)?,
        ease_factor: row.get(1)?,
        interval_days: row.get(2)?,
        repetitions: row.get(3)?,
        next_review: from_timestamp(row.get(4)?, 4)?,
        last_reviewed: last_reviewed.map(|secs| from_timestamp(secs, 5)).transpose()?,
    })
}

const VOCABULARY_COLUMNS: &str = "id, language_id, word, translation, pronunciation, example_sentence, difficulty_level, created_at";

fn vocabulary_from_row(row: &Row<'_>) -> rusqlite::Result<VocabularyItem> {
    Ok(VocabularyItem {
        id: row.get(0)?,
        language_id: row.get(1)?,
        word: row.get(2)?,
        translation: row.get(3)?,
        pronunciation: row.get(4)?,
        example_sentence: row.get(5)?,
        difficulty_level: row.get(6)?,
        created_at: from_timestamp(row.get(7)?, 7)?,
    })
}

fn language_from_row(row: &Row<'_>) -> rusqlite::Result<Language> {
    Ok(Language {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        flag_emoji: row.get(3)?,
        created_at: from_timestamp(row.get(4)?, 4)?,
    })
}

const LANGUAGE_COLUMNS: &str = "id, name, code, flag_emoji, created_at";

fn language_by_id(conn: &Connection, id: i64) -> Result<Option<Language>> {
    let language = conn
        .query_row(
            &format!("SELECT {} FROM languages WHERE id = ?1", LANGUAGE_COLUMNS),
            params![id],
            language_from_row,
        )
        .optional()?;

    Ok(language)
}

fn language_by_code(conn: &Connection, code: &str) -> Result<Option<Language>> {
    let language = conn
        .query_row(
            &format!("SELECT {} FROM languages WHERE code = ?1", LANGUAGE_COLUMNS),
            params![code.trim()],
            language_from_row,
        )
        .optional()?;

    Ok(language)
}

fn insert_language(conn: &Connection, req: NewLanguage, now: DateTime<Utc>) -> Result<Language> {
    validation::validate_language(&req)?;

    let name = validation::sanitize_string(req.name);
    let code = validation::sanitize_string(req.code);
    let flag_emoji = validation::sanitize_string(req.flag_emoji);

    conn.execute(
        "INSERT INTO languages (name, code, flag_emoji, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, code, flag_emoji, now.timestamp()],
    )?;

    let id = conn.last_insert_rowid();
    info!("Language '{}' created with id {}", name, id);

    Ok(Language {
        id,
        name,
        code,
        flag_emoji,
        created_at: now,
    })
}

/// Inserts the item and its card. Callers run this inside a transaction.
fn insert_vocabulary(
    conn: &Connection,
    req: NewVocabulary,
    now: DateTime<Utc>,
) -> Result<VocabularyItem> {
    validation::validate_vocabulary(&req)?;

    if language_by_id(conn, req.language_id)?.is_none() {
        return Err(Error::LanguageNotFound(req.language_id));
    }

    let word = validation::sanitize_string(req.word);
    let translation = validation::sanitize_string(req.translation);
    let pronunciation = validation::sanitize_optional_string(req.pronunciation);
    let example_sentence = validation::sanitize_optional_string(req.example_sentence);

    conn.execute(
        "INSERT INTO vocabulary (language_id, word, translation, pronunciation, example_sentence, difficulty_level, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            req.language_id,
            word,
            translation,
            pronunciation,
            example_sentence,
            req.difficulty_level,
            now.timestamp()
        ],
    )?;

    let item_id = conn.last_insert_rowid();
    let card = ReviewCard::new(item_id, now);

    conn.execute(
        "INSERT INTO review_cards (item_id, ease_factor, interval_days, repetitions, next_review, last_reviewed)
         VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
        params![
            card.item_id,
            card.ease_factor,
            card.interval_days,
            card.repetitions,
            card.next_review.timestamp()
        ],
    )?;

    debug!("Vocabulary '{}' inserted with id {}", word, item_id);

    Ok(VocabularyItem {
        id: item_id,
        language_id: req.language_id,
        word,
        translation,
        pronunciation,
        example_sentence,
        difficulty_level: req.difficulty_level,
        created_at: now,
    })
}

/// Escapes `%`, `_` and `\` so the query matches literally under `ESCAPE '\'`.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SQLite-backed card and vocabulary store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file and makes sure all tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened database at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Creates tables for languages, vocabulary, review cards and app state.
    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS languages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                code TEXT NOT NULL UNIQUE,
                flag_emoji TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS vocabulary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                language_id INTEGER NOT NULL,
                word TEXT NOT NULL,
                translation TEXT NOT NULL,
                pronunciation TEXT,
                example_sentence TEXT,
                difficulty_level INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (language_id) REFERENCES languages(id) ON DELETE CASCADE
            )",
            (),
        )?;

        // One card per vocabulary item, keyed by the item id
        conn.execute(
            "CREATE TABLE IF NOT EXISTS review_cards (
                item_id INTEGER PRIMARY KEY,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 0,
                repetitions INTEGER NOT NULL DEFAULT 0,
                next_review INTEGER NOT NULL,
                last_reviewed INTEGER,
                FOREIGN KEY (item_id) REFERENCES vocabulary(id) ON DELETE CASCADE
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_vocabulary_language_id ON vocabulary(language_id)",
            (),
        )?;

        // The due query walks this index instead of every card
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_review_cards_due ON review_cards(next_review, item_id)",
            (),
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO app_state (key, value) VALUES ('day_offset', '0')",
            (),
        )?;

        Ok(Self { conn })
    }

    /// Number of days the review clock runs ahead of wall time.
    pub fn day_offset(&self) -> Result<i64> {
        let value: String = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = 'day_offset'",
            [],
            |row| row.get(0),
        )?;

        value.parse::<i64>().map_err(|_| {
            Error::CorruptState(format!("day_offset is not a number: '{}'", value))
        })
    }

    /// Advances the review clock by 24 hours (for exercising the schedule)
    pub fn advance_day(&self) -> Result<()> {
        let offset = self.day_offset()? + 1;

        self.conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'day_offset'",
            params![offset.to_string()],
        )?;

        info!("Review clock advanced to day offset {}", offset);
        Ok(())
    }

    pub fn create_language(&self, req: NewLanguage) -> Result<Language> {
        insert_language(&self.conn, req, self.now()?)
    }

    pub fn get_languages(&self) -> Result<Vec<Language>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, code, flag_emoji, created_at FROM languages ORDER BY name ASC",
        )?;

        let languages = stmt
            .query_map([], language_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(languages)
    }

    pub fn get_language(&self, id: i64) -> Result<Option<Language>> {
        language_by_id(&self.conn, id)
    }

    pub fn get_language_by_code(&self, code: &str) -> Result<Option<Language>> {
        language_by_code(&self.conn, code)
    }

    /// Deletes a language together with its vocabulary and their review cards.
    pub fn delete_language(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM languages WHERE id = ?1", params![id])?;

        if deleted == 0 {
            return Err(Error::LanguageNotFound(id));
        }

        info!("Language {} deleted", id);
        Ok(())
    }

    /// Adds a vocabulary item and its review card in one transaction.
    ///
    /// The new card is due immediately.
    pub fn create_vocabulary(&self, req: NewVocabulary) -> Result<VocabularyItem> {
        let now = self.now()?;

        let tx = self.conn.unchecked_transaction()?;
        let item = insert_vocabulary(&tx, req, now)?;
        tx.commit()?;

        info!("Vocabulary '{}' created with id {}", item.word, item.id);
        Ok(item)
    }

    /// Adds a batch of words to the language with `language.code`, creating the
    /// language if needed. Either everything is written or nothing is.
    ///
    /// The `language_id` of each word is ignored. Returns the language and the
    /// number of words added.
    pub fn import_vocabulary(
        &self,
        language: NewLanguage,
        words: Vec<NewVocabulary>,
    ) -> Result<(Language, usize)> {
        let now = self.now()?;

        let tx = self.conn.unchecked_transaction()?;
        let language = match language_by_code(&tx, &language.code)? {
            Some(existing) => existing,
            None => insert_language(&tx, language, now)?,
        };

        let count = words.len();
        for word in words {
            insert_vocabulary(
                &tx,
                NewVocabulary {
                    language_id: language.id,
                    ..word
                },
                now,
            )?;
        }
        tx.commit()?;

        info!("Imported {} word(s) into '{}'", count, language.name);
        Ok((language, count))
    }

    /// Retrieves all vocabulary for a language, newest first
    pub fn get_vocabulary_by_language(&self, language_id: i64) -> Result<Vec<VocabularyItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM vocabulary WHERE language_id = ?1 ORDER BY created_at DESC, id DESC",
            VOCABULARY_COLUMNS
        ))?;

        let vocabulary = stmt
            .query_map(params![language_id], vocabulary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(vocabulary)
    }

    /// Finds vocabulary whose word or translation contains `query`.
    pub fn search_vocabulary(&self, query: &str, limit: usize) -> Result<Vec<VocabularyItem>> {
        let pattern = format!("%{}%", escape_like(query.trim()));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM vocabulary
             WHERE word LIKE ?1 ESCAPE '\\' OR translation LIKE ?1 ESCAPE '\\'
             ORDER BY word ASC
             LIMIT ?2",
            VOCABULARY_COLUMNS
        ))?;

        let vocabulary = stmt
            .query_map(params![pattern, limit as i64], vocabulary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(vocabulary)
    }

    /// Deletes a vocabulary item; its review card goes with it.
    pub fn delete_vocabulary(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM vocabulary WHERE id = ?1", params![id])?;

        if deleted == 0 {
            return Err(Error::NotFound(id));
        }

        info!("Vocabulary {} deleted", id);
        Ok(())
    }

    pub fn review_stats(&self, now: DateTime<Utc>) -> Result<ReviewStats> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN last_reviewed IS NULL THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN last_reviewed IS NOT NULL AND interval_days < ?2 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN last_reviewed IS NOT NULL AND interval_days >= ?2 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN next_review <= ?1 THEN 1 ELSE 0 END), 0)
             FROM review_cards",
            params![now.timestamp(), MATURE_INTERVAL_DAYS],
            |row| {
                Ok(ReviewStats {
                    total_cards: row.get::<_, i64>(0)? as usize,
                    new_cards: row.get::<_, i64>(1)? as usize,
                    learning_cards: row.get::<_, i64>(2)? as usize,
                    mature_cards: row.get::<_, i64>(3)? as usize,
                    due_cards: row.get::<_, i64>(4)? as usize,
                })
            },
        )?;

        Ok(stats)
    }
}

impl CardStore for Database {
    fn get_card(&self, item_id: i64) -> Result<Option<ReviewCard>> {
        let card = self
            .conn
            .query_row(
                &format!("SELECT {} FROM review_cards WHERE item_id = ?1", CARD_COLUMNS),
                params![item_id],
                card_from_row,
            )
            .optional()?;

        Ok(card)
    }

    /// Writes the card's state after a review.
    fn put_card(&self, card: &ReviewCard) -> Result<()> {
        self.conn.execute(
            "INSERT INTO review_cards (item_id, ease_factor, interval_days, repetitions, next_review, last_reviewed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(item_id) DO UPDATE SET
                ease_factor = excluded.ease_factor,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                next_review = excluded.next_review,
                last_reviewed = excluded.last_reviewed",
            params![
                card.item_id,
                card.ease_factor,
                card.interval_days,
                card.repetitions,
                card.next_review.timestamp(),
                card.last_reviewed.map(|t| t.timestamp())
            ],
        )?;

        debug!(
            "Stored card {}: interval {}d, next review {}",
            card.item_id, card.interval_days, card.next_review
        );
        Ok(())
    }

    fn all_cards(&self) -> Result<Vec<ReviewCard>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM review_cards ORDER BY item_id ASC",
            CARD_COLUMNS
        ))?;

        let cards = stmt
            .query_map([], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cards)
    }

    /// Retrieves cards due for review, most overdue first.
    fn scan_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewCard>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM review_cards
             WHERE next_review <= ?1
             ORDER BY next_review ASC, item_id ASC
             LIMIT ?2",
            CARD_COLUMNS
        ))?;

        let cards = stmt
            .query_map(params![now.timestamp(), limit as i64], card_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(cards)
    }
}

impl VocabularyStore for Database {
    fn get_vocabulary(&self, item_id: i64) -> Result<Option<VocabularyItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {} FROM vocabulary WHERE id = ?1", VOCABULARY_COLUMNS),
                params![item_id],
                vocabulary_from_row,
            )
            .optional()?;

        Ok(item)
    }
}

/// Wall time shifted by the persisted day offset.
impl Clock for Database {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now() + Duration::days(self.day_offset()?))
    }
}
