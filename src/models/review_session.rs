//! Review session over the global due set.
//! Shows one due card at a time and fetches the due head again after every answer,
//! so a card is never graded from a stale list.

use super::{Quality, ReviewCard, VocabularyItem};
use crate::error::{Error, Result};
use crate::scheduler::ReviewService;
use crate::store::{CardStore, Clock, VocabularyStore};
use log::debug;

/// Walks the due cards until none are left or `limit` cards have been reviewed.
pub struct ReviewSession<'a, S, C> {
    service: &'a ReviewService<S, C>,
    current: Option<(ReviewCard, VocabularyItem)>,
    show_answer: bool,
    limit: usize,
    reviewed: usize,
    passed: usize,
    lapsed: usize,
}

impl<'a, S, C> ReviewSession<'a, S, C>
where
    S: CardStore + VocabularyStore,
    C: Clock,
{
    pub fn start(service: &'a ReviewService<S, C>, limit: usize) -> Result<Self> {
        let mut session = Self {
            service,
            current: None,
            show_answer: false,
            limit,
            reviewed: 0,
            passed: 0,
            lapsed: 0,
        };
        session.fetch_next()?;
        Ok(session)
    }

    fn fetch_next(&mut self) -> Result<()> {
        self.show_answer = false;
        self.current = if self.reviewed >= self.limit {
            None
        } else {
            self.service.get_due_reviews(Some(1))?.into_iter().next()
        };
        debug!(
            "Session card: {:?}",
            self.current.as_ref().map(|(card, _)| card.item_id)
        );
        Ok(())
    }

    pub fn current(&self) -> Option<&(ReviewCard, VocabularyItem)> {
        self.current.as_ref()
    }

    /// Whether the translation of the current card is revealed.
    pub fn show_answer(&self) -> bool {
        self.show_answer
    }

    pub fn toggle_answer(&mut self) {
        self.show_answer = !self.show_answer;
    }

    /// Grades the current card with the raw button value and moves on.
    ///
    /// An invalid quality leaves the session on the same card. If the card has
    /// disappeared from the store the session moves to the next due card and
    /// the `NotFound` error is returned. Returns `Ok(None)` once the session is over.
    pub fn grade(&mut self, quality: i32) -> Result<Option<ReviewCard>> {
        let quality = Quality::try_from(quality)?;
        let Some((card, _)) = &self.current else {
            return Ok(None);
        };

        let next = match self.service.review(card.item_id, quality) {
            Ok(next) => next,
            Err(err @ Error::NotFound(_)) => {
                self.fetch_next()?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        self.reviewed += 1;
        if quality.is_passing() {
            self.passed += 1;
        } else {
            self.lapsed += 1;
        }

        self.fetch_next()?;
        Ok(Some(next))
    }

    pub fn reviewed_count(&self) -> usize {
        self.reviewed
    }

    pub fn passed_count(&self) -> usize {
        self.passed
    }

    pub fn lapsed_count(&self) -> usize {
        self.lapsed
    }

    /// True when nothing is due any more or the session limit was reached.
    pub fn is_completed(&self) -> bool {
        self.current.is_none()
    }

    pub fn progress_message(&self) -> String {
        if self.is_completed() {
            format!(
                "Session complete: {} reviewed ({} passed, {} to relearn)",
                self.reviewed, self.passed, self.lapsed
            )
        } else {
            format!("Card {} of at most {}", self.reviewed + 1, self.limit)
        }
    }
}
