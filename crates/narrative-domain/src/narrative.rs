//! Narrative module - the fundamental unit of the belief model

use crate::confidence::Confidence;
use crate::error::{check_range, DomainError};
use crate::evidence::Evidence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Narrative identifier (e.g., "ai-capex-supercycle")
pub type NarrativeId = String;

/// An assumption a narrative depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    /// Identifier, unique within its narrative
    pub id: String,

    /// The assumption itself
    pub text: String,

    /// How likely/damaging its failure would be, in [0, 100]
    pub fragility_score: u8,
}

impl Assumption {
    /// Fragility above which an assumption counts as high-fragility
    pub const HIGH_FRAGILITY: u8 = 50;

    /// Create a new assumption
    pub fn new(id: impl Into<String>, text: impl Into<String>, fragility_score: u8) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            fragility_score,
        }
    }

    /// Whether this assumption is considered fragile
    pub fn is_fragile(&self) -> bool {
        self.fragility_score > Self::HIGH_FRAGILITY
    }
}

/// Decay configuration
///
/// The staleness signal reaches 50% after half of `half_life_days` has passed
/// since `last_reinforced`, and saturates at 100% after a full half-life.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decay {
    /// Half-life in days, must be > 0
    pub half_life_days: f64,

    /// When supporting evidence last arrived
    pub last_reinforced: DateTime<Utc>,
}

impl Decay {
    /// Create a decay configuration
    pub fn new(half_life_days: f64, last_reinforced: DateTime<Utc>) -> Self {
        Self {
            half_life_days,
            last_reinforced,
        }
    }

    pub(crate) fn validate(&self, owner: &str) -> Result<(), DomainError> {
        if self.half_life_days.is_finite() && self.half_life_days > 0.0 {
            Ok(())
        } else {
            Err(DomainError::out_of_range(
                owner,
                "decay.half_life_days",
                self.half_life_days,
                "> 0",
            ))
        }
    }
}

/// An asset's signed sensitivity to a narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetExposure {
    /// Ticker symbol, matched exactly against holdings
    pub ticker: String,

    /// Display name
    pub name: String,

    /// Sensitivity in [-1, 1]; positive means the asset benefits if the narrative holds
    pub exposure_weight: f64,
}

impl AssetExposure {
    /// Create a new asset exposure
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, exposure_weight: f64) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            exposure_weight,
        }
    }
}

/// Point-in-time confidence record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSnapshot {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Score at that time, in [0, 100]
    pub confidence_score: u8,

    /// What changed
    pub summary: String,
}

/// Kind of weak reference between narratives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// The other narrative is strengthened by this one
    Reinforces,
    /// The two narratives pull against each other
    Conflicts,
    /// The narratives share drivers
    Overlaps,
}

impl RelationKind {
    /// All kinds, in display order
    pub const ALL: [RelationKind; 3] = [
        RelationKind::Reinforces,
        RelationKind::Conflicts,
        RelationKind::Overlaps,
    ];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Reinforces => "reinforces",
            RelationKind::Conflicts => "conflicts",
            RelationKind::Overlaps => "overlaps",
        }
    }
}

/// Ids of related narratives, grouped by kind
///
/// These are weak references: an id need not exist in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedNarratives {
    /// Narratives this one reinforces
    #[serde(default)]
    pub reinforces: Vec<NarrativeId>,

    /// Narratives this one conflicts with
    #[serde(default)]
    pub conflicts: Vec<NarrativeId>,

    /// Narratives this one overlaps
    #[serde(default)]
    pub overlaps: Vec<NarrativeId>,
}

impl RelatedNarratives {
    /// Ids for one kind of relation
    pub fn ids(&self, kind: RelationKind) -> &[NarrativeId] {
        match kind {
            RelationKind::Reinforces => &self.reinforces,
            RelationKind::Conflicts => &self.conflicts,
            RelationKind::Overlaps => &self.overlaps,
        }
    }
}

/// A named market belief
///
/// Narratives are loaded once from static configuration and are not mutated
/// during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    /// Unique identifier
    pub id: NarrativeId,

    /// Display name
    pub name: String,

    /// One-paragraph description
    pub summary: String,

    /// Current confidence
    pub confidence: Confidence,

    /// Assumptions the narrative depends on, in display order
    #[serde(default)]
    pub assumptions: Vec<Assumption>,

    /// Evidence supporting the narrative
    #[serde(default)]
    pub supporting_evidence: Vec<Evidence>,

    /// Evidence contradicting the narrative
    #[serde(default)]
    pub contradicting_evidence: Vec<Evidence>,

    /// Decay configuration
    pub decay: Decay,

    /// Weak references to other narratives
    #[serde(default)]
    pub related_narratives: RelatedNarratives,

    /// Assets sensitive to this narrative
    #[serde(default)]
    pub affected_assets: Vec<AssetExposure>,

    /// Confidence history, oldest first
    #[serde(default)]
    pub history: Vec<NarrativeSnapshot>,

    /// When the narrative was first tracked
    pub created_at: DateTime<Utc>,

    /// Free-text labels
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Narrative {
    /// Create a narrative with no assumptions, evidence, assets or tags
    pub fn new(
        id: impl Into<NarrativeId>,
        name: impl Into<String>,
        summary: impl Into<String>,
        confidence: Confidence,
        decay: Decay,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            summary: summary.into(),
            confidence,
            assumptions: Vec::new(),
            supporting_evidence: Vec::new(),
            contradicting_evidence: Vec::new(),
            decay,
            related_narratives: RelatedNarratives::default(),
            affected_assets: Vec::new(),
            history: Vec::new(),
            created_at,
            tags: Vec::new(),
        }
    }

    /// Add an assumption
    pub fn with_assumption(mut self, assumption: Assumption) -> Self {
        self.assumptions.push(assumption);
        self
    }

    /// Add supporting evidence
    pub fn with_support(mut self, evidence: Evidence) -> Self {
        self.supporting_evidence.push(evidence);
        self
    }

    /// Add contradicting evidence
    pub fn with_contradiction(mut self, evidence: Evidence) -> Self {
        self.contradicting_evidence.push(evidence);
        self
    }

    /// Add an affected asset
    pub fn with_asset(mut self, asset: AssetExposure) -> Self {
        self.affected_assets.push(asset);
        self
    }

    /// Add a history snapshot
    pub fn with_snapshot(mut self, snapshot: NarrativeSnapshot) -> Self {
        self.history.push(snapshot);
        self
    }

    /// Set the related narratives
    pub fn with_related(mut self, related: RelatedNarratives) -> Self {
        self.related_narratives = related;
        self
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Exposure weight of `ticker`, or 0 when the narrative does not name it
    pub fn exposure_weight(&self, ticker: &str) -> f64 {
        self.affected_assets
            .iter()
            .find(|a| a.ticker == ticker)
            .map(|a| a.exposure_weight)
            .unwrap_or(0.0)
    }

    /// Whether any assumption is fragile
    pub fn has_fragile_assumption(&self) -> bool {
        self.assumptions.iter().any(Assumption::is_fragile)
    }

    /// Exact, case-sensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check every bounded field
    ///
    /// # Errors
    /// Returns the first violated bound
    pub fn validate(&self) -> Result<(), DomainError> {
        let owner = self.id.as_str();
        if owner.is_empty() {
            return Err(DomainError::Empty {
                owner: self.name.clone(),
                field: "id",
            });
        }

        self.confidence.validate(owner)?;
        self.decay.validate(owner)?;

        for assumption in &self.assumptions {
            check_range(
                owner,
                "assumption.fragility_score",
                f64::from(assumption.fragility_score),
                0.0,
                100.0,
                "[0, 100]",
            )?;
        }

        for evidence in self
            .supporting_evidence
            .iter()
            .chain(&self.contradicting_evidence)
        {
            evidence.validate(owner)?;
        }

        for asset in &self.affected_assets {
            if asset.ticker.trim().is_empty() {
                return Err(DomainError::Empty {
                    owner: owner.to_string(),
                    field: "affected_asset.ticker",
                });
            }
            check_range(
                owner,
                "affected_asset.exposure_weight",
                asset.exposure_weight,
                -1.0,
                1.0,
                "[-1, 1]",
            )?;
        }

        for snapshot in &self.history {
            check_range(
                owner,
                "history.confidence_score",
                f64::from(snapshot.confidence_score),
                0.0,
                100.0,
                "[0, 100]",
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::ConfidenceTrend;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    fn narrative() -> Narrative {
        Narrative::new(
            "ai-capex-supercycle",
            "AI Capex Supercycle",
            "Hyperscalers spending on AI infrastructure",
            Confidence::new(78, ConfidenceTrend::Up, at(10)).unwrap(),
            Decay::new(30.0, at(9)),
            at(1),
        )
        .with_asset(AssetExposure::new("NVDA", "NVIDIA", 0.95))
        .with_asset(AssetExposure::new("AMD", "AMD", 0.75))
    }

    #[test]
    fn test_exposure_weight_lookup() {
        let n = narrative();
        assert_eq!(n.exposure_weight("NVDA"), 0.95);
        assert_eq!(n.exposure_weight("AMD"), 0.75);
    }

    #[test]
    fn test_exposure_weight_missing_ticker_is_zero() {
        let n = narrative();
        assert_eq!(n.exposure_weight("TSLA"), 0.0);
        // Exact match only
        assert_eq!(n.exposure_weight("nvda"), 0.0);
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(narrative().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_exposure_out_of_range() {
        let n = narrative().with_asset(AssetExposure::new("TSLA", "Tesla", -1.5));
        let err = n.validate().unwrap_err();
        assert!(matches!(
            err,
            DomainError::OutOfRange { field: "affected_asset.exposure_weight", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_fragility_out_of_range() {
        let n = narrative().with_assumption(Assumption::new("a1", "GPU supply tight", 101));
        assert!(n.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_half_life() {
        let mut n = narrative();
        n.decay.half_life_days = 0.0;
        assert!(n.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_evidence_weight() {
        let n = narrative().with_support(Evidence::new("e1", "src", "desc", at(2), 1.2));
        assert!(n.validate().is_err());
    }

    #[test]
    fn test_fragile_assumption() {
        let n = narrative().with_assumption(Assumption::new("a1", "x", 50));
        assert!(!n.has_fragile_assumption());
        let n = n.with_assumption(Assumption::new("a2", "y", 55));
        assert!(n.has_fragile_assumption());
    }

    #[test]
    fn test_related_ids_by_kind() {
        let n = narrative().with_related(RelatedNarratives {
            reinforces: vec!["energy-demand-surge".into()],
            conflicts: vec!["tech-valuation-bubble".into()],
            overlaps: vec![],
        });
        assert_eq!(n.related_narratives.ids(RelationKind::Reinforces).len(), 1);
        assert!(n.related_narratives.ids(RelationKind::Overlaps).is_empty());
    }

    #[test]
    fn test_serde_uses_snake_case_and_defaults() {
        let json = r#"{
            "id": "x",
            "name": "X",
            "summary": "s",
            "confidence": {"score": 50, "trend": "flat", "last_updated": "2025-01-02T00:00:00Z"},
            "decay": {"half_life_days": 14, "last_reinforced": "2025-01-01T00:00:00Z"},
            "created_at": "2024-12-01T00:00:00Z"
        }"#;
        let n: Narrative = serde_json::from_str(json).unwrap();
        assert_eq!(n.confidence.trend, ConfidenceTrend::Flat);
        assert!(n.affected_assets.is_empty());
        assert!(n.tags.is_empty());
        assert!(n.validate().is_ok());
    }
}
