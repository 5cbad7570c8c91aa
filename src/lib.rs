pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use config::Config;
pub use database::{Database, MemoryStore};
pub use error::{Error, Result};
pub use models::{Language, Quality, ReviewCard, ReviewSession, VocabularyItem};
pub use scheduler::{ReviewService, due_cards};
