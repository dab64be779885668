//! Narrative confidence state
//!
//! Confidence is a 0-100 snapshot score with a trend marker. It is tracked
//! independently of decay: nothing in this crate rewrites a score based on
//! how stale a narrative has become.

use crate::error::{check_range, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction the market's conviction has been moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTrend {
    /// Conviction rising
    Up,
    /// Conviction falling
    Down,
    /// No meaningful change
    Flat,
}

impl ConfidenceTrend {
    /// Get the trend name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTrend::Up => "up",
            ConfidenceTrend::Down => "down",
            ConfidenceTrend::Flat => "flat",
        }
    }
}

impl fmt::Display for ConfidenceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse bucket used to color and group scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceBand {
    /// Score below 40
    Low,
    /// Score in [40, 70)
    Medium,
    /// Score of 70 or more
    High,
}

impl ConfidenceBand {
    /// Lowest score that counts as high confidence
    pub const HIGH_FLOOR: u8 = 70;

    /// Lowest score that counts as medium confidence
    pub const MEDIUM_FLOOR: u8 = 40;

    /// Classify a score
    pub fn from_score(score: u8) -> Self {
        if score >= Self::HIGH_FLOOR {
            ConfidenceBand::High
        } else if score >= Self::MEDIUM_FLOOR {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Get the band name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::Low => "low",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current confidence in a narrative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// Score in [0, 100]
    pub score: u8,

    /// Recent direction of the score
    pub trend: ConfidenceTrend,

    /// When the score was last revised
    pub last_updated: DateTime<Utc>,
}

impl Confidence {
    /// Maximum score
    pub const MAX_SCORE: u8 = 100;

    /// Create a confidence snapshot
    ///
    /// # Errors
    /// Returns error if `score` exceeds 100
    pub fn new(
        score: u8,
        trend: ConfidenceTrend,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let confidence = Self {
            score,
            trend,
            last_updated,
        };
        confidence.validate("confidence")?;
        Ok(confidence)
    }

    /// Band for this score
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_score(self.score)
    }

    /// Score as a fraction in [0, 1]
    pub fn fraction(&self) -> f64 {
        f64::from(self.score) / 100.0
    }

    pub(crate) fn validate(&self, owner: &str) -> Result<(), DomainError> {
        check_range(
            owner,
            "confidence.score",
            f64::from(self.score),
            0.0,
            f64::from(Self::MAX_SCORE),
            "[0, 100]",
        )
    }
}
