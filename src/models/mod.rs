pub mod language;
pub mod quality;
pub mod review_card;
pub mod review_session;
pub mod review_stats;
pub mod sm2;
pub mod vocabulary;

pub use language::{Language, NewLanguage};
pub use quality::Quality;
pub use review_card::ReviewCard;
pub use review_session::ReviewSession;
pub use review_stats::ReviewStats;
pub use vocabulary::{NewVocabulary, VocabularyItem};
