mod app;

use app::App;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vocab_review::Config;

#[derive(Parser)]
#[command(name = "vocab-review", about = "Spaced repetition review for vocabulary", version)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "VOCAB_REVIEW_DB")]
    db: Option<PathBuf>,

    /// Maximum number of cards per review session or listing
    #[arg(long, global = true, env = "VOCAB_REVIEW_LIMIT")]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Review due cards interactively
    Review,

    /// List due cards
    Due {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grade a single card: 1 (hard), 3 (good) or 5 (easy)
    Grade { card_id: i64, quality: i32 },

    /// Show card counts by learning stage
    Stats,

    /// Move the review clock one day forward
    NextDay,

    /// Language management
    #[command(subcommand)]
    Language(LanguageCommand),

    /// Add a word to a language
    Add {
        /// Language code, e.g. "pl"
        language: String,
        word: String,
        translation: String,
        #[arg(long)]
        pronunciation: Option<String>,
        #[arg(long)]
        example: Option<String>,
        /// Difficulty from 1 to 5
        #[arg(long, default_value = "1")]
        difficulty: i32,
    },

    /// List the words of a language
    Words { language: String },

    /// Search words and translations
    Search { query: String },

    /// Delete a word and its review card
    Remove { item_id: i64 },

    /// Export a language to a JSON file
    Export { language: String, path: PathBuf },

    /// Import a language from a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand)]
enum LanguageCommand {
    /// Create a language
    Add {
        name: String,
        code: String,
        #[arg(default_value = "🏳")]
        flag: String,
    },
    /// List languages
    List,
    /// Delete a language with all of its words
    Remove { code: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::new(cli.db, cli.limit);
    let app = App::open(config)?;

    match cli.command {
        Command::Review => app.review()?,
        Command::Due { json } => app.due(json)?,
        Command::Grade { card_id, quality } => app.grade(card_id, quality)?,
        Command::Stats => app.stats()?,
        Command::NextDay => app.next_day()?,
        Command::Language(LanguageCommand::Add { name, code, flag }) => {
            app.add_language(&name, &code, &flag)?
        }
        Command::Language(LanguageCommand::List) => app.languages()?,
        Command::Language(LanguageCommand::Remove { code }) => app.remove_language(&code)?,
        Command::Add {
            language,
            word,
            translation,
            pronunciation,
            example,
            difficulty,
        } => app.add_word(&language, &word, &translation, pronunciation, example, difficulty)?,
        Command::Words { language } => app.words(&language)?,
        Command::Search { query } => app.search(&query)?,
        Command::Remove { item_id } => app.remove_word(item_id)?,
        Command::Export { language, path } => app.export(&language, &path)?,
        Command::Import { path } => app.import(&path)?,
    }

    Ok(())
}
