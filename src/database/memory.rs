//! In-memory card and vocabulary store.
//!
//! Cards are kept in a map keyed by item id plus an ordered `(next_review, item_id)`
//! index, so the due scan only touches due cards.

use crate::error::Result;
use crate::models::{ReviewCard, VocabularyItem};
use crate::store::{CardStore, VocabularyStore};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    cards: HashMap<i64, ReviewCard>,
    due_index: BTreeSet<(DateTime<Utc>, i64)>,
    vocabulary: HashMap<i64, VocabularyItem>,
}

impl Inner {
    fn put_card(&mut self, card: ReviewCard) {
        if let Some(old) = self.cards.get(&card.item_id) {
            self.due_index.remove(&(old.next_review, old.item_id));
        }
        self.due_index.insert((card.next_review, card.item_id));
        self.cards.insert(card.item_id, card);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores a vocabulary item together with a fresh card due at its creation time.
    pub fn insert_vocabulary(&self, item: VocabularyItem) -> ReviewCard {
        let card = ReviewCard::new(item.id, item.created_at);
        let mut inner = self.lock();
        inner.vocabulary.insert(item.id, item);
        inner.put_card(card.clone());
        card
    }

    pub fn card_count(&self) -> usize {
        self.lock().cards.len()
    }
}

impl CardStore for MemoryStore {
    fn get_card(&self, item_id: i64) -> Result<Option<ReviewCard>> {
        Ok(self.lock().cards.get(&item_id).cloned())
    }

    fn put_card(&self, card: &ReviewCard) -> Result<()> {
        self.lock().put_card(card.clone());
        Ok(())
    }

    fn all_cards(&self) -> Result<Vec<ReviewCard>> {
        let inner = self.lock();
        let mut cards: Vec<ReviewCard> = inner.cards.values().cloned().collect();
        cards.sort_by_key(|c| c.item_id);
        Ok(cards)
    }

    fn scan_due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<ReviewCard>> {
        let inner = self.lock();
        let cards = inner
            .due_index
            .iter()
            .take_while(|(next_review, _)| *next_review <= now)
            .take(limit)
            .filter_map(|(_, id)| inner.cards.get(id).cloned())
            .collect();
        Ok(cards)
    }
}

impl VocabularyStore for MemoryStore {
    fn get_vocabulary(&self, item_id: i64) -> Result<Option<VocabularyItem>> {
        Ok(self.lock().vocabulary.get(&item_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn item(id: i64, created_at: DateTime<Utc>) -> VocabularyItem {
        VocabularyItem {
            id,
            language_id: 1,
            word: format!("word{}", id),
            translation: format!("translation{}", id),
            pronunciation: None,
            example_sentence: None,
            difficulty_level: 1,
            created_at,
        }
    }

    #[test]
    fn test_index_follows_updates() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryStore::new();
        let mut card = store.insert_vocabulary(item(1, t0));
        store.insert_vocabulary(item(2, t0));

        assert_eq!(store.scan_due(t0, 10).unwrap().len(), 2);

        card.next_review = t0 + Duration::days(3);
        store.put_card(&card).unwrap();

        let due = store.scan_due(t0, 10).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].item_id, 2);
        assert_eq!(store.card_count(), 2);

        let later = store.scan_due(t0 + Duration::days(3), 10).unwrap();
        let ids: Vec<i64> = later.iter().map(|c| c.item_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_ties_break_by_item_id() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryStore::new();
        for id in [5, 3, 9] {
            store.insert_vocabulary(item(id, t0));
        }

        let ids: Vec<i64> = store
            .scan_due(t0, 2)
            .unwrap()
            .iter()
            .map(|c| c.item_id)
            .collect();
        assert_eq!(ids, vec![3, 5]);
    }
}
