//! Recall quality reported by the reviewer. Only three buttons exist, so only
//! three values are accepted.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Quality at or above this value counts as a successful recall.
pub const PASSING_THRESHOLD: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Quality {
    Hard = 1,
    Good = 3,
    Easy = 5,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Hard, Quality::Good, Quality::Easy];

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn is_passing(self) -> bool {
        self.value() >= PASSING_THRESHOLD
    }

    pub fn label(self) -> &'static str {
        match self {
            Quality::Hard => "Hard",
            Quality::Good => "Good",
            Quality::Easy => "Easy",
        }
    }
}

impl TryFrom<i32> for Quality {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            1 => Ok(Quality::Hard),
            3 => Ok(Quality::Good),
            5 => Ok(Quality::Easy),
            other => Err(Error::InvalidQuality(other)),
        }
    }
}

impl From<Quality> for i32 {
    fn from(quality: Quality) -> Self {
        quality.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_button_values() {
        assert_eq!(Quality::try_from(1).unwrap(), Quality::Hard);
        assert_eq!(Quality::try_from(3).unwrap(), Quality::Good);
        assert_eq!(Quality::try_from(5).unwrap(), Quality::Easy);
    }

    #[test]
    fn test_rejects_other_values() {
        for value in [-1, 0, 2, 4, 6, 100] {
            match Quality::try_from(value) {
                Err(Error::InvalidQuality(v)) => assert_eq!(v, value),
                other => panic!("expected InvalidQuality for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_passing() {
        assert!(!Quality::Hard.is_passing());
        assert!(Quality::Good.is_passing());
        assert!(Quality::Easy.is_passing());
    }

    #[test]
    fn test_serde_uses_integer_form() {
        assert_eq!(serde_json::to_string(&Quality::Good).unwrap(), "3");
        assert!(serde_json::from_str::<Quality>("4").is_err());
    }
}
