//! Command handlers and the terminal review session.

use anyhow::{Context, Result, anyhow};
use std::io::{self, BufRead, Write};
use std::path::Path;
use vocab_review::database::Database;
use vocab_review::export::json::{export_language_to_path, import_language};
use vocab_review::models::sm2::{format_interval, preview_intervals};
use vocab_review::models::{Language, NewLanguage, NewVocabulary, VocabularyItem};
use vocab_review::store::{CardStore, Clock, VocabularyStore};
use vocab_review::{Config, Error, ReviewService, ReviewSession};

/// What the reviewer typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Reveal,
    Grade(i32),
    Quit,
    Unknown,
}

fn parse_answer(line: &str) -> Answer {
    match line.trim().to_lowercase().as_str() {
        "" | "s" => Answer::Reveal,
        "q" => Answer::Quit,
        "h" => Answer::Grade(1),
        "g" => Answer::Grade(3),
        "e" => Answer::Grade(5),
        other => other.parse().map(Answer::Grade).unwrap_or(Answer::Unknown),
    }
}

fn print_word(out: &mut impl Write, item: &VocabularyItem) -> io::Result<()> {
    match &item.pronunciation {
        Some(p) => writeln!(out, "  {}  [{}]", item.word, p),
        None => writeln!(out, "  {}", item.word),
    }
}

/// Runs a review session over `input`/`output` until the due set is exhausted,
/// the limit is reached, the reviewer quits or input ends.
pub fn run_review<S, C>(
    service: &ReviewService<S, C>,
    limit: usize,
    mut input: impl BufRead,
    mut out: impl Write,
) -> Result<()>
where
    S: CardStore + VocabularyStore,
    C: Clock,
{
    let mut session = ReviewSession::start(service, limit)?;

    while let Some((card, item)) = session.current().cloned() {
        writeln!(out, "\n{}", session.progress_message())?;
        print_word(&mut out, &item)?;

        if session.show_answer() {
            writeln!(out, "  = {}", item.translation)?;
            if let Some(example) = &item.example_sentence {
                writeln!(out, "  e.g. {}", example)?;
            }
            let options: Vec<String> = preview_intervals(&card)
                .iter()
                .map(|(quality, days)| {
                    format!("[{}] {} {}", quality.value(), quality.label(), format_interval(*days))
                })
                .collect();
            write!(out, "{}  [q] quit > ", options.join("  "))?;
        } else {
            write!(out, "[s] show answer  [q] quit > ")?;
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_answer(&line) {
            Answer::Reveal => session.toggle_answer(),
            Answer::Quit => break,
            Answer::Grade(quality) => match session.grade(quality) {
                Ok(_) => {}
                Err(err @ (Error::InvalidQuality(_) | Error::NotFound(_))) => {
                    writeln!(out, "{}", err)?;
                }
                Err(err) => return Err(err.into()),
            },
            Answer::Unknown => writeln!(out, "Type s, h/g/e (or 1/3/5), or q")?,
        }
    }

    writeln!(out, "\n{}", session.progress_message())?;
    Ok(())
}

pub struct App {
    db: Database,
    config: Config,
}

impl App {
    pub fn open(config: Config) -> Result<Self> {
        let db = Database::open(&config.database_path).with_context(|| {
            format!("failed to open database {}", config.database_path.display())
        })?;
        Ok(Self { db, config })
    }

    fn service(&self) -> ReviewService<&Database, &Database> {
        ReviewService::new(&self.db, &self.db)
    }

    fn language(&self, code: &str) -> Result<Language> {
        self.db
            .get_language_by_code(code)?
            .ok_or_else(|| anyhow!("no language with code '{}'", code))
    }

    pub fn review(&self) -> Result<()> {
        let stdin = io::stdin();
        run_review(&self.service(), self.config.review_limit, stdin.lock(), io::stdout())
    }

    pub fn due(&self, json: bool) -> Result<()> {
        let due = self.service().get_due_reviews(Some(self.config.review_limit))?;

        if json {
            let output: Vec<serde_json::Value> = due
                .iter()
                .map(|(card, item)| serde_json::json!({ "card": card, "vocabulary": item }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if due.is_empty() {
            println!("Nothing is due.");
            return Ok(());
        }
        for (card, item) in &due {
            println!(
                "{:>6}  {:<24} {:<24} due {}",
                card.item_id,
                item.word,
                item.translation,
                card.next_review.format("%Y-%m-%d")
            );
        }
        Ok(())
    }

    pub fn grade(&self, card_id: i64, quality: i32) -> Result<()> {
        let card = self.service().submit_review(card_id, quality)?;
        println!(
            "Card {} next due {} (in {})",
            card.item_id,
            card.next_review.format("%Y-%m-%d"),
            format_interval(card.interval_days)
        );
        Ok(())
    }

    pub fn stats(&self) -> Result<()> {
        let stats = self.db.review_stats(self.db.now()?)?;
        println!("Total:    {}", stats.total_cards);
        println!("New:      {}", stats.new_cards);
        println!("Learning: {}", stats.learning_cards);
        println!("Mature:   {}", stats.mature_cards);
        println!("Due:      {}", stats.due_cards);
        Ok(())
    }

    pub fn next_day(&self) -> Result<()> {
        self.db.advance_day()?;
        println!("Review date is now {}", self.db.now()?.format("%Y-%m-%d"));
        Ok(())
    }

    pub fn add_language(&self, name: &str, code: &str, flag: &str) -> Result<()> {
        let language = self.db.create_language(NewLanguage::new(name, code, flag))?;
        println!("Language '{}' created.", language.name);
        Ok(())
    }

    pub fn languages(&self) -> Result<()> {
        for language in self.db.get_languages()? {
            println!("{} {:<6} {}", language.flag_emoji, language.code, language.name);
        }
        Ok(())
    }

    pub fn remove_language(&self, code: &str) -> Result<()> {
        let language = self.language(code)?;
        self.db.delete_language(language.id)?;
        println!("Language '{}' deleted.", language.name);
        Ok(())
    }

    pub fn add_word(
        &self,
        language: &str,
        word: &str,
        translation: &str,
        pronunciation: Option<String>,
        example_sentence: Option<String>,
        difficulty_level: i32,
    ) -> Result<()> {
        let language = self.language(language)?;
        let item = self.db.create_vocabulary(NewVocabulary {
            language_id: language.id,
            word: word.to_string(),
            translation: translation.to_string(),
            pronunciation,
            example_sentence,
            difficulty_level,
        })?;
        println!("Added '{}' (id {}), due now.", item.word, item.id);
        Ok(())
    }

    pub fn words(&self, language: &str) -> Result<()> {
        let language = self.language(language)?;
        for item in self.db.get_vocabulary_by_language(language.id)? {
            println!("{:>6}  {:<24} {}", item.id, item.word, item.translation);
        }
        Ok(())
    }

    pub fn search(&self, query: &str) -> Result<()> {
        let results = self.db.search_vocabulary(query, self.config.review_limit)?;
        if results.is_empty() {
            println!("No results found for '{}'.", query);
        }
        for item in results {
            println!("{:>6}  {:<24} {}", item.id, item.word, item.translation);
        }
        Ok(())
    }

    pub fn remove_word(&self, item_id: i64) -> Result<()> {
        self.db.delete_vocabulary(item_id)?;
        println!("Word {} deleted.", item_id);
        Ok(())
    }

    pub fn export(&self, language: &str, path: &Path) -> Result<()> {
        let language = self.language(language)?;
        let export = export_language_to_path(&self.db, language.id, path)?;
        println!(
            "Exported {} word(s) to '{}'.",
            export.vocabulary.len(),
            path.display()
        );
        Ok(())
    }

    pub fn import(&self, path: &Path) -> Result<()> {
        let (language, count) = import_language(&self.db, path)?;
        println!("Imported {} word(s) into '{}'.", count, language.name);
        Ok(())
    }
}
