//! Narrative Storage Layer
//!
//! Implements the `NarrativeStore` trait over an in-memory catalog.
//!
//! # Architecture
//!
//! - The catalog is loaded once (JSON file or the bundled sample) and is
//!   read-only afterwards
//! - Every narrative is validated at load time; bad data is a load error,
//!   never a runtime panic
//! - Edges and related-narrative ids are weak references and may dangle
//!
//! # Examples
//!
//! ```no_run
//! use narrative_store::InMemoryStore;
//! use narrative_domain::NarrativeStore;
//!
//! let store = InMemoryStore::from_path("catalog.json").unwrap();
//! let capex = store.get_narrative("ai-capex-supercycle");
//! ```

#![warn(missing_docs)]

pub mod graph;
pub mod sample;

pub use graph::{edges_for, related, resolved_edges, RelatedRef, ResolvedEdge};
pub use sample::{sample_catalog, sample_portfolio};

use chrono::{DateTime, Utc};
use narrative_domain::traits::{NarrativeFilter, NarrativeStore};
use narrative_domain::{BeliefEdge, DomainError, Narrative};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading a catalog
#[derive(Error, Debug)]
pub enum StoreError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Catalog is not valid JSON or does not match the schema
    #[error("Invalid catalog format: {0}")]
    Format(#[from] serde_json::Error),

    /// A narrative or edge violates a bound
    #[error("Invalid catalog data: {0}")]
    Invalid(#[from] DomainError),

    /// Two narratives share an id
    #[error("Duplicate narrative id: {0}")]
    DuplicateId(String),
}

/// Serialized form of a catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Narratives, in display order
    #[serde(default)]
    pub narratives: Vec<Narrative>,

    /// Belief edges
    #[serde(default)]
    pub edges: Vec<BeliefEdge>,
}

/// In-memory implementation of `NarrativeStore`
///
/// Narratives keep their source insertion order; lookups by id go through
/// a hash index built at construction.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    narratives: Vec<Narrative>,
    index: HashMap<String, usize>,
    edges: Vec<BeliefEdge>,
}

impl InMemoryStore {
    /// Build a store from a catalog, validating every entry
    ///
    /// # Errors
    /// Returns the first bound violation, or `DuplicateId` when two
    /// narratives share an id. Dangling edge endpoints are accepted.
    pub fn new(catalog: Catalog) -> Result<Self, StoreError> {
        for narrative in &catalog.narratives {
            narrative.validate()?;
        }
        for edge in &catalog.edges {
            edge.validate()?;
        }

        let mut index = HashMap::with_capacity(catalog.narratives.len());
        for (pos, narrative) in catalog.narratives.iter().enumerate() {
            if index.insert(narrative.id.clone(), pos).is_some() {
                return Err(StoreError::DuplicateId(narrative.id.clone()));
            }
        }

        Ok(Self {
            narratives: catalog.narratives,
            index,
            edges: catalog.edges,
        })
    }

    /// Parse and validate a JSON catalog
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        Self::new(catalog)
    }

    /// Read, parse and validate a JSON catalog file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            narratives = store.narratives.len(),
            edges = store.edges.len(),
            "Loaded narrative catalog"
        );
        Ok(store)
    }

    /// The bundled sample catalog, with timestamps relative to `now`
    pub fn sample(now: DateTime<Utc>) -> Result<Self, StoreError> {
        Self::new(sample_catalog(now))
    }

    /// Number of narratives
    pub fn len(&self) -> usize {
        self.narratives.len()
    }

    /// Whether the store holds no narratives
    pub fn is_empty(&self) -> bool {
        self.narratives.is_empty()
    }

    /// Copy the contents back out as a serializable catalog
    pub fn to_catalog(&self) -> Catalog {
        Catalog {
            narratives: self.narratives.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl NarrativeStore for InMemoryStore {
    fn get_narrative(&self, id: &str) -> Option<&Narrative> {
        self.index.get(id).map(|&pos| &self.narratives[pos])
    }

    fn list_narratives(&self, filter: &NarrativeFilter) -> Vec<&Narrative> {
        self.narratives.iter().filter(|n| filter.matches(n)).collect()
    }

    fn list_edges(&self) -> &[BeliefEdge] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use narrative_domain::{BeliefRelationship, Confidence, ConfidenceTrend, Decay};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()
    }

    fn narrative(id: &str, name: &str) -> Narrative {
        Narrative::new(
            id,
            name,
            format!("{} summary", name),
            Confidence::new(50, ConfidenceTrend::Flat, at()).unwrap(),
            Decay::new(14.0, at()),
            at(),
        )
    }

    #[test]
    fn test_get_narrative_by_id() {
        let store = InMemoryStore::new(Catalog {
            narratives: vec![narrative("a", "Alpha"), narrative("b", "Beta")],
            edges: vec![],
        })
        .unwrap();

        assert_eq!(store.get_narrative("b").unwrap().name, "Beta");
        assert!(store.get_narrative("missing").is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = InMemoryStore::new(Catalog {
            narratives: vec![narrative("z", "Zulu"), narrative("a", "Alpha")],
            edges: vec![],
        })
        .unwrap();

        let ids: Vec<&str> = store
            .all_narratives()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = InMemoryStore::new(Catalog {
            narratives: vec![narrative("a", "Alpha"), narrative("a", "Again")],
            edges: vec![],
        });
        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_invalid_narrative_rejected() {
        let mut bad = narrative("a", "Alpha");
        bad.decay.half_life_days = -1.0;
        let result = InMemoryStore::new(Catalog {
            narratives: vec![bad],
            edges: vec![],
        });
        assert!(matches!(result, Err(StoreError::Invalid(_))));
    }

    #[test]
    fn test_dangling_edge_accepted() {
        let edge = BeliefEdge::new("e1", "a", "ghost", BeliefRelationship::Conflicts, 0.5).unwrap();
        let store = InMemoryStore::new(Catalog {
            narratives: vec![narrative("a", "Alpha")],
            edges: vec![edge],
        })
        .unwrap();
        assert_eq!(store.list_edges().len(), 1);
    }

    #[test]
    fn test_empty_catalog_json() {
        let store = InMemoryStore::from_json_str("{}").unwrap();
        assert!(store.is_empty());
        assert!(store.list_edges().is_empty());
    }
}
