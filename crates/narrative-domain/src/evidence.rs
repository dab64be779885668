//! Evidence for or against a narrative

use crate::error::{check_range, DomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single piece of evidence attached to a narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Identifier, unique within its narrative
    pub id: String,

    /// Where the evidence came from (e.g., "NVIDIA Earnings")
    pub source: String,

    /// What the evidence says
    pub description: String,

    /// When the evidence was observed
    pub timestamp: DateTime<Utc>,

    /// Importance in [0, 1]
    pub weight: f64,
}

impl Evidence {
    /// Create a new evidence entry
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            description: description.into(),
            timestamp,
            weight,
        }
    }

    pub(crate) fn validate(&self, owner: &str) -> Result<(), DomainError> {
        check_range(owner, "evidence.weight", self.weight, 0.0, 1.0, "[0, 1]")
    }
}
