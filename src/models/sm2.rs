//! SM-2 (SuperMemo 2) spaced repetition scheduling.
//!
//! Given a card and the reviewer's recall quality, computes the card's next state:
//! - The easiness factor moves by `0.1 - (5-q) * (0.08 + (5-q) * 0.02)` and never drops below 1.3
//! - A lapse (Hard) resets the streak and brings the card back after 1 day
//! - A passing review (Good/Easy) grows the interval: 1 day → 6 days → interval × new EF,
//!   capped at `MAX_INTERVAL_DAYS`
//!
//! Scheduling is a pure function of its inputs; the caller persists the result.

use super::review_card::MIN_EASE_FACTOR;
use super::{Quality, ReviewCard};
use crate::error::Result;
use chrono::{DateTime, Duration, Utc};

const LAPSE_INTERVAL_DAYS: u32 = 1;
const FIRST_INTERVAL_DAYS: u32 = 1;
const SECOND_INTERVAL_DAYS: u32 = 6;

/// Upper bound on any interval, roughly a hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Returns the easiness factor after a review of the given quality.
pub fn next_ease_factor(ease_factor: f64, quality: Quality) -> f64 {
    let q = quality.value() as f64;
    let new_ef = ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    new_ef.max(MIN_EASE_FACTOR)
}

/// Calculates the card's state after being reviewed at `now`.
pub fn schedule(card: &ReviewCard, quality: Quality, now: DateTime<Utc>) -> ReviewCard {
    let new_ef = next_ease_factor(card.ease_factor, quality);

    let (new_interval, new_repetitions) = if quality.is_passing() {
        let new_reps = card.repetitions.saturating_add(1);
        let new_int = match new_reps {
            1 => FIRST_INTERVAL_DAYS,
            2 => SECOND_INTERVAL_DAYS,
            _ => {
                let grown = (f64::from(card.interval_days) * new_ef).round();
                grown.min(f64::from(MAX_INTERVAL_DAYS)) as u32
            }
        };
        (new_int, new_reps)
    } else {
        (LAPSE_INTERVAL_DAYS, 0)
    };

    ReviewCard {
        item_id: card.item_id,
        ease_factor: new_ef,
        interval_days: new_interval,
        repetitions: new_repetitions,
        next_review: now
            .checked_add_signed(Duration::days(i64::from(new_interval)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        last_reviewed: Some(now),
    }
}

/// Like [`schedule`], but takes the raw button value. Anything other than
/// 1, 3 or 5 is rejected with `InvalidQuality`.
pub fn schedule_raw(card: &ReviewCard, quality: i32, now: DateTime<Utc>) -> Result<ReviewCard> {
    let quality = Quality::try_from(quality)?;
    Ok(schedule(card, quality, now))
}

/// Interval in days each button would give the card, in Hard/Good/Easy order.
pub fn preview_intervals(card: &ReviewCard) -> [(Quality, u32); 3] {
    // The interval does not depend on `now`.
    let at = card.next_review;
    Quality::ALL.map(|q| (q, schedule(card, q, at).interval_days))
}

/// Short human-readable form of an interval, e.g. `6d`, `2w`, `3mo`.
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn card(ease_factor: f64, interval_days: u32, repetitions: u32) -> ReviewCard {
        ReviewCard {
            item_id: 1,
            ease_factor,
            interval_days,
            repetitions,
            next_review: date(2024, 1, 1),
            last_reviewed: None,
        }
    }

    #[test]
    fn test_first_review() {
        let next = schedule(&card(2.5, 0, 0), Quality::Good, date(2024, 1, 1));
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.repetitions, 1);
    }

    #[test]
    fn test_second_review() {
        let next = schedule(&card(2.5, 1, 1), Quality::Good, date(2024, 1, 2));
        assert_eq!(next.interval_days, 6);
        assert_eq!(next.repetitions, 2);
    }

    #[test]
    fn test_bootstrap_sequence_from_fresh_card() {
        let fresh = ReviewCard::new(3, date(2024, 1, 1));

        let first = schedule(&fresh, Quality::Good, date(2024, 1, 1));
        assert_eq!(first.interval_days, 1);

        let second = schedule(&first, Quality::Good, date(2024, 1, 2));
        assert_eq!(second.interval_days, 6);

        let third = schedule(&second, Quality::Good, date(2024, 1, 8));
        let expected = (6.0 * third.ease_factor).round() as u32;
        assert_eq!(third.interval_days, expected);
        assert_eq!(third.repetitions, 3);
    }

    #[test]
    fn test_easy_review_scenario() {
        let next = schedule(&card(2.5, 6, 2), Quality::Easy, date(2024, 1, 10));

        assert_eq!(next.repetitions, 3);
        assert!((next.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(next.interval_days, 16);
        assert_eq!(next.next_review, date(2024, 1, 26));
        assert_eq!(next.last_reviewed, Some(date(2024, 1, 10)));
    }

    #[test]
    fn test_hard_review_scenario() {
        let next = schedule(&card(2.5, 6, 2), Quality::Hard, date(2024, 1, 10));

        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.next_review, date(2024, 1, 11));
    }

    #[test]
    fn test_hard_resets_regardless_of_history() {
        for (interval, reps) in [(0, 0), (1, 1), (6, 2), (120, 9)] {
            let next = schedule(&card(2.0, interval, reps), Quality::Hard, date(2024, 3, 1));
            assert_eq!(next.repetitions, 0);
            assert_eq!(next.interval_days, 1);
            // EF should still be updated
            assert!(next.ease_factor < 2.0);
        }
    }

    #[test]
    fn test_passing_increments_repetitions() {
        for quality in [Quality::Good, Quality::Easy] {
            for reps in [0, 1, 2, 7] {
                let next = schedule(&card(2.5, 10, reps), quality, date(2024, 1, 1));
                assert_eq!(next.repetitions, reps + 1);
            }
        }
    }

    #[test]
    fn test_ease_deltas() {
        assert!((next_ease_factor(2.5, Quality::Easy) - 2.6).abs() < 1e-9);
        assert!((next_ease_factor(2.5, Quality::Good) - 2.36).abs() < 1e-9);
        assert!((next_ease_factor(2.5, Quality::Hard) - 1.96).abs() < 1e-9);
    }

    #[test]
    fn test_ef_floor() {
        let mut current = card(1.3, 1, 1);
        for quality in [Quality::Hard, Quality::Good, Quality::Hard, Quality::Hard, Quality::Good] {
            current = schedule(&current, quality, date(2024, 1, 1));
            assert!(current.ease_factor >= 1.3);
        }
        assert_eq!(current.ease_factor, 1.3);
    }

    #[test]
    fn test_interval_non_decreasing_on_passing_streak() {
        let mut current = ReviewCard::new(1, date(2024, 1, 1));
        let mut previous = 0;
        for _ in 0..8 {
            current = schedule(&current, Quality::Good, current.next_review);
            assert!(current.interval_days >= previous);
            previous = current.interval_days;
        }
    }

    #[test]
    fn test_repeated_easy_reviews_stay_capped() {
        let mut current = ReviewCard::new(1, date(2024, 1, 1));
        for _ in 0..40 {
            current = schedule(&current, Quality::Easy, date(2024, 1, 1));
            assert!(current.interval_days <= MAX_INTERVAL_DAYS);
        }
        assert_eq!(current.interval_days, MAX_INTERVAL_DAYS);
        assert_eq!(current.repetitions, 40);

        let next = schedule(&current, Quality::Easy, date(2024, 1, 1));
        assert_eq!(next.interval_days, MAX_INTERVAL_DAYS);
        assert!(next.next_review > date(2024, 1, 1));
    }

    #[test]
    fn test_next_review_saturates_at_latest_date() {
        let late = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        let next = schedule(&card(2.5, 6, 2), Quality::Easy, late);

        assert_eq!(next.interval_days, 16);
        assert_eq!(next.next_review, DateTime::<Utc>::MAX_UTC);
        assert_eq!(next.last_reviewed, Some(late));
    }

    #[test]
    fn test_schedule_is_deterministic() {
        let input = card(2.2, 6, 2);
        let a = schedule(&input, Quality::Good, date(2024, 5, 5));
        let b = schedule(&input, Quality::Good, date(2024, 5, 5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_schedule_raw_rejects_invalid_quality() {
        let input = card(2.5, 6, 2);
        for raw in [0, 2, 4, 6] {
            match schedule_raw(&input, raw, date(2024, 1, 10)) {
                Err(Error::InvalidQuality(v)) => assert_eq!(v, raw),
                other => panic!("expected InvalidQuality, got {:?}", other),
            }
        }
        assert_eq!(input, card(2.5, 6, 2));

        let next = schedule_raw(&input, 5, date(2024, 1, 10)).unwrap();
        assert_eq!(next.interval_days, 16);
    }

    #[test]
    fn test_preview_intervals() {
        let preview = preview_intervals(&card(2.5, 6, 2));
        assert_eq!(preview[0], (Quality::Hard, 1));
        assert_eq!(preview[1], (Quality::Good, 14));
        assert_eq!(preview[2], (Quality::Easy, 16));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(6), "6d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(16), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(800), "2y");
    }
}
