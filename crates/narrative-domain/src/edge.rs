//! Belief edges - directed relations between narratives

use crate::error::{check_range, DomainError};
use crate::narrative::NarrativeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of relation between two narratives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeliefRelationship {
    /// The source narrative makes the target more likely
    Reinforces,

    /// The source narrative makes the target less likely
    Conflicts,

    /// The source narrative requires the target to hold
    DependsOn,
}

impl BeliefRelationship {
    /// Get the relationship name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BeliefRelationship::Reinforces => "reinforces",
            BeliefRelationship::Conflicts => "conflicts",
            BeliefRelationship::DependsOn => "depends_on",
        }
    }
}

impl fmt::Display for BeliefRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge in the belief graph
///
/// Both endpoints are weak references into the store; either may dangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefEdge {
    /// Edge identifier
    pub id: String,

    /// Source narrative
    pub from_narrative_id: NarrativeId,

    /// Target narrative
    pub to_narrative_id: NarrativeId,

    /// Type of relation
    pub relationship: BeliefRelationship,

    /// Strength of relation [0.0, 1.0]
    pub strength: f64,
}

impl BeliefEdge {
    /// Create a new edge
    ///
    /// # Errors
    /// Returns error if `strength` is outside [0, 1]
    pub fn new(
        id: impl Into<String>,
        from: impl Into<NarrativeId>,
        to: impl Into<NarrativeId>,
        relationship: BeliefRelationship,
        strength: f64,
    ) -> Result<Self, DomainError> {
        let edge = Self {
            id: id.into(),
            from_narrative_id: from.into(),
            to_narrative_id: to.into(),
            relationship,
            strength,
        };
        edge.validate()?;
        Ok(edge)
    }

    /// Check the strength bound
    pub fn validate(&self) -> Result<(), DomainError> {
        check_range(&self.id, "edge.strength", self.strength, 0.0, 1.0, "[0, 1]")
    }

    /// Whether the edge touches `id` at either end
    pub fn touches(&self, id: &str) -> bool {
        self.from_narrative_id == id || self.to_narrative_id == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_creation() {
        let edge = BeliefEdge::new(
            "e1",
            "ai-capex-supercycle",
            "energy-demand-surge",
            BeliefRelationship::Reinforces,
            0.85,
        )
        .unwrap();
        assert!(edge.touches("ai-capex-supercycle"));
        assert!(edge.touches("energy-demand-surge"));
        assert!(!edge.touches("fed-rate-cuts"));
    }

    #[test]
    fn test_invalid_strength() {
        assert!(BeliefEdge::new("e1", "a", "b", BeliefRelationship::Conflicts, 1.01).is_err());
        assert!(BeliefEdge::new("e1", "a", "b", BeliefRelationship::Conflicts, -0.1).is_err());
    }

    #[test]
    fn test_relationship_wire_names() {
        let json = serde_json::to_string(&BeliefRelationship::DependsOn).unwrap();
        assert_eq!(json, "\"depends_on\"");
        let parsed: BeliefRelationship = serde_json::from_str("\"reinforces\"").unwrap();
        assert_eq!(parsed, BeliefRelationship::Reinforces);
    }
}
