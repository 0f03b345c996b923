//! Donation badges derived from a donor's donation count.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A donation milestone badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    /// Awarded at the first donation.
    #[serde(rename = "First Drop")]
    FirstDrop,
    /// Awarded at 5 donations.
    #[serde(rename = "Life Saver")]
    LifeSaver,
    /// Awarded at 10 donations.
    #[serde(rename = "Hero")]
    Hero,
    /// Awarded at 25 donations.
    #[serde(rename = "Champion")]
    Champion,
    /// Awarded at 50 donations.
    #[serde(rename = "Legend")]
    Legend,
}

impl Badge {
    /// Badge thresholds in ascending order.
    const THRESHOLDS: [(i32, Badge); 5] = [
        (1, Badge::FirstDrop),
        (5, Badge::LifeSaver),
        (10, Badge::Hero),
        (25, Badge::Champion),
        (50, Badge::Legend),
    ];

    /// The donation count at which this badge is earned.
    pub fn threshold(&self) -> i32 {
        match self {
            Self::FirstDrop => 1,
            Self::LifeSaver => 5,
            Self::Hero => 10,
            Self::Champion => 25,
            Self::Legend => 50,
        }
    }

    /// Display name of the badge.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstDrop => "First Drop",
            Self::LifeSaver => "Life Saver",
            Self::Hero => "Hero",
            Self::Champion => "Champion",
            Self::Legend => "Legend",
        }
    }

    /// The exact badge set implied by a donation count.
    ///
    /// Always recomputed wholesale from the count; callers must never
    /// patch the stored set incrementally.
    pub fn for_donation_count(count: i32) -> Vec<Badge> {
        Self::THRESHOLDS
            .iter()
            .filter(|(threshold, _)| count >= *threshold)
            .map(|(_, badge)| *badge)
            .collect()
    }

    /// Badge names for a donation count, in threshold order.
    pub fn names_for_donation_count(count: i32) -> Vec<String> {
        Self::for_donation_count(count)
            .into_iter()
            .map(|b| b.as_str().to_string())
            .collect()
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_donations_no_badges() {
        assert!(Badge::for_donation_count(0).is_empty());
    }

    #[test]
    fn test_four_donations() {
        assert_eq!(Badge::for_donation_count(4), vec![Badge::FirstDrop]);
    }

    #[test]
    fn test_five_donations() {
        assert_eq!(
            Badge::for_donation_count(5),
            vec![Badge::FirstDrop, Badge::LifeSaver]
        );
    }

    #[test]
    fn test_fifty_donations_all_badges() {
        let badges = Badge::for_donation_count(50);
        assert_eq!(badges.len(), 5);
        assert_eq!(badges.last(), Some(&Badge::Legend));
    }

    #[test]
    fn test_names_match_display() {
        assert_eq!(
            Badge::names_for_donation_count(10),
            vec!["First Drop", "Life Saver", "Hero"]
        );
    }
}
