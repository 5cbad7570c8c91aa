//! Persistence seams the scheduler depends on.
//!
//! Cards and vocabulary live in separate stores joined by item id at read
//! time. Both are implemented by the SQLite [`Database`](crate::database::Database)
//! and by the in-memory [`MemoryStore`](crate::database::MemoryStore).

use crate::error::Result;
use crate::models::{ReviewCard, VocabularyItem};
use chrono::{DateTime, Duration, Utc};

pub trait CardStore {
    fn get_card(&self, item_id: i64) -> Result<Option<ReviewCard>>;

    /// Inserts the card or replaces the stored state for its item.
    fn put_card(&self, card: &ReviewCard) -> Result<()>;

    fn all_cards(&self) -> Result<Vec<ReviewCard>>;

    /// Cards with `next_review <= now`, ordered by `(next_review, item_id)`,
    /// at most `limit` of them.
    fn scan_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewCard>>;
}

pub trait VocabularyStore {
    fn get_vocabulary(&self, item_id: i64) -> Result<Option<VocabularyItem>>;
}

/// Source of the current time for review operations.
pub trait Clock {
    fn now(&self) -> Result<DateTime<Utc>>;
}

/// Wall-clock UTC time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now())
    }
}

/// A clock frozen at a given instant, movable by whole days.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn advance_days(&mut self, days: i64) {
        self.0 += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime<Utc>> {
        Ok(self.0)
    }
}

impl<T: CardStore + ?Sized> CardStore for &T {
    fn get_card(&self, item_id: i64) -> Result<Option<ReviewCard>> {
        (**self).get_card(item_id)
    }

    fn put_card(&self, card: &ReviewCard) -> Result<()> {
        (**self).put_card(card)
    }

    fn all_cards(&self) -> Result<Vec<ReviewCard>> {
        (**self).all_cards()
    }

    fn scan_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewCard>> {
        (**self).scan_due(now, limit)
    }
}

impl<T: VocabularyStore + ?Sized> VocabularyStore for &T {
    fn get_vocabulary(&self, item_id: i64) -> Result<Option<VocabularyItem>> {
        (**self).get_vocabulary(item_id)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Result<DateTime<Utc>> {
        (**self).now()
    }
}
