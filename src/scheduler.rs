//! Due-set selection and the review operations used by a review session.

use crate::error::{Error, Result};
use crate::models::{Quality, ReviewCard, VocabularyItem, sm2};
use crate::store::{CardStore, Clock, VocabularyStore};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// Number of due cards fetched when the caller does not ask for a limit.
pub const DEFAULT_REVIEW_LIMIT: usize = 20;

/// Returns up to `limit` due cards with their vocabulary, most overdue first.
///
/// Ties on `next_review` are broken by item id. The result is a snapshot;
/// callers should fetch again after every review.
pub fn due_cards<S>(store: &S, now: DateTime<Utc>, limit: usize) -> Result<Vec<(ReviewCard, VocabularyItem)>>
where
    S: CardStore + VocabularyStore + ?Sized,
{
    if limit == 0 {
        return Ok(Vec::new());
    }

    // Orphaned cards are skipped, so fetch more until `limit` pairs are found
    // or the due set runs out.
    let mut fetch = limit;
    let (due, orphans) = loop {
        let cards = store.scan_due(now, fetch)?;
        let exhausted = cards.len() < fetch;
        let mut due = Vec::with_capacity(cards.len().min(limit));
        let mut orphans = Vec::new();

        for card in cards {
            if due.len() == limit {
                break;
            }
            match store.get_vocabulary(card.item_id)? {
                Some(item) => due.push((card, item)),
                None => orphans.push(card.item_id),
            }
        }

        if due.len() == limit || exhausted {
            break (due, orphans);
        }
        fetch = limit + orphans.len();
    };

    // Cards are deleted with their item, so this means the stores disagree
    for item_id in orphans {
        warn!("Skipping card {} with no vocabulary item", item_id);
    }

    debug!("{} due card(s) at {} (limit {})", due.len(), now, limit);
    Ok(due)
}

/// Review operations over a card/vocabulary store and a clock.
pub struct ReviewService<S, C> {
    store: S,
    clock: C,
}

impl<S, C> ReviewService<S, C>
where
    S: CardStore + VocabularyStore,
    C: Clock,
{
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Result<DateTime<Utc>> {
        self.clock.now()
    }

    /// Due cards at the clock's current time. `None` uses [`DEFAULT_REVIEW_LIMIT`].
    pub fn get_due_reviews(&self, limit: Option<usize>) -> Result<Vec<(ReviewCard, VocabularyItem)>> {
        let now = self.clock.now()?;
        due_cards(&self.store, now, limit.unwrap_or(DEFAULT_REVIEW_LIMIT))
    }

    /// Reviews a card with the raw button value and stores its new state.
    ///
    /// The quality is checked before the store is touched, and nothing is
    /// written for an unknown card.
    pub fn submit_review(&self, card_id: i64, quality: i32) -> Result<ReviewCard> {
        let quality = Quality::try_from(quality)?;
        self.review(card_id, quality)
    }

    pub fn review(&self, card_id: i64, quality: Quality) -> Result<ReviewCard> {
        let card = self.store.get_card(card_id)?.ok_or(Error::NotFound(card_id))?;
        let now = self.clock.now()?;

        let next = sm2::schedule(&card, quality, now);
        self.store.put_card(&next)?;

        info!(
            "Reviewed card {} as {}: ease {:.2} -> {:.2}, interval {}d, next review {}",
            card_id,
            quality.label(),
            card.ease_factor,
            next.ease_factor,
            next.interval_days,
            next.next_review
        );
        Ok(next)
    }
}
