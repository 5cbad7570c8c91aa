//! Scheduling state for one vocabulary item.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const INITIAL_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Cards whose interval reaches this many days are counted as mature.
pub const MATURE_INTERVAL_DAYS: u32 = 21;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewCard {
    /// Identity of the owning vocabulary item; also the card's identity.
    pub item_id: i64,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    pub next_review: DateTime<Utc>,
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewCard {
    /// A fresh card is due immediately.
    pub fn new(item_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            item_id,
            ease_factor: INITIAL_EASE_FACTOR,
            interval_days: 0,
            repetitions: 0,
            next_review: created_at,
            last_reviewed: None,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none()
    }

    pub fn is_mature(&self) -> bool {
        self.interval_days >= MATURE_INTERVAL_DAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_new_card_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let card = ReviewCard::new(7, now);

        assert_eq!(card.item_id, 7);
        assert_eq!(card.ease_factor, 2.5);
        assert_eq!(card.interval_days, 0);
        assert_eq!(card.repetitions, 0);
        assert_eq!(card.next_review, now);
        assert!(card.last_reviewed.is_none());
        assert!(card.is_due(now));
    }

    #[test]
    fn test_due_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let card = ReviewCard::new(1, now);

        assert!(card.is_due(now));
        assert!(card.is_due(now + Duration::seconds(1)));
        assert!(!card.is_due(now - Duration::seconds(1)));
    }
}
