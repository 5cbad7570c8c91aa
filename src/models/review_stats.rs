use serde::{Deserialize, Serialize};

/// Counts of review cards by learning stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStats {
    pub total_cards: usize,
    /// Never reviewed.
    pub new_cards: usize,
    /// Reviewed, interval still below the mature threshold.
    pub learning_cards: usize,
    pub mature_cards: usize,
    pub due_cards: usize,
}
