//! Belief graph traversal
//!
//! Edges and related-narrative lists hold weak references. These helpers
//! resolve them against a store and never fail on a missing id.

use narrative_domain::traits::NarrativeStore;
use narrative_domain::{BeliefEdge, Narrative, RelationKind};
use tracing::debug;

/// An edge whose both endpoints exist
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedEdge<'a> {
    /// The edge itself
    pub edge: &'a BeliefEdge,

    /// Source narrative
    pub from: &'a Narrative,

    /// Target narrative
    pub to: &'a Narrative,
}

/// A related-narrative id resolved against the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelatedRef<'a> {
    /// The id names a narrative in the store
    Known(&'a Narrative),

    /// The id dangles
    Unknown(&'a str),
}

impl<'a> RelatedRef<'a> {
    /// Display label: the narrative name, or the raw id when unknown
    pub fn label(&self) -> &'a str {
        match *self {
            RelatedRef::Known(n) => &n.name,
            RelatedRef::Unknown(id) => id,
        }
    }
}

/// Edges whose both endpoints exist, in store order
///
/// Dangling edges are skipped.
pub fn resolved_edges<S>(store: &S) -> Vec<ResolvedEdge<'_>>
where
    S: NarrativeStore + ?Sized,
{
    store
        .list_edges()
        .iter()
        .filter_map(|edge| {
            let from = store.get_narrative(&edge.from_narrative_id);
            let to = store.get_narrative(&edge.to_narrative_id);
            match (from, to) {
                (Some(from), Some(to)) => Some(ResolvedEdge { edge, from, to }),
                _ => {
                    debug!(
                        edge = %edge.id,
                        from = %edge.from_narrative_id,
                        to = %edge.to_narrative_id,
                        "Skipping dangling belief edge"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Edges touching `id` at either end, dangling or not
pub fn edges_for<'a, S>(store: &'a S, id: &str) -> Vec<&'a BeliefEdge>
where
    S: NarrativeStore + ?Sized,
{
    store.list_edges().iter().filter(|e| e.touches(id)).collect()
}

/// Resolve one kind of `narrative`'s related ids
pub fn related<'a, S>(store: &'a S, narrative: &'a Narrative, kind: RelationKind) -> Vec<RelatedRef<'a>>
where
    S: NarrativeStore + ?Sized,
{
    narrative
        .related_narratives
        .ids(kind)
        .iter()
        .map(|id| match store.get_narrative(id) {
            Some(n) => RelatedRef::Known(n),
            None => RelatedRef::Unknown(id.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, InMemoryStore};
    use chrono::Utc;
    use narrative_domain::{
        BeliefRelationship, Confidence, ConfidenceTrend, Decay, RelatedNarratives,
    };

    fn narrative(id: &str) -> Narrative {
        let now = Utc::now();
        Narrative::new(
            id,
            id.to_uppercase(),
            "",
            Confidence::new(50, ConfidenceTrend::Flat, now).unwrap(),
            Decay::new(14.0, now),
            now,
        )
    }

    fn store() -> InMemoryStore {
        let a = narrative("a").with_related(RelatedNarratives {
            reinforces: vec!["b".into(), "ghost".into()],
            conflicts: vec![],
            overlaps: vec![],
        });
        InMemoryStore::new(Catalog {
            narratives: vec![a, narrative("b"), narrative("c")],
            edges: vec![
                BeliefEdge::new("e1", "a", "b", BeliefRelationship::Reinforces, 0.8).unwrap(),
                BeliefEdge::new("e2", "a", "ghost", BeliefRelationship::Conflicts, 0.4).unwrap(),
                BeliefEdge::new("e3", "c", "b", BeliefRelationship::DependsOn, 0.3).unwrap(),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_resolved_edges_skip_dangling() {
        let store = store();
        let edges = resolved_edges(&store);
        let ids: Vec<&str> = edges.iter().map(|e| e.edge.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3"]);
        assert_eq!(edges[0].from.name, "A");
        assert_eq!(edges[0].to.name, "B");
    }

    #[test]
    fn test_edges_for_includes_both_directions() {
        let store = store();
        let ids: Vec<&str> = edges_for(&store, "b").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e3"]);
        assert_eq!(edges_for(&store, "a").len(), 2);
        assert!(edges_for(&store, "nobody").is_empty());
    }

    #[test]
    fn test_related_resolves_unknown() {
        let store = store();
        let a = store.get_narrative("a").unwrap();
        let refs = related(&store, a, RelationKind::Reinforces);
        assert_eq!(refs.len(), 2);
        assert!(matches!(refs[0], RelatedRef::Known(n) if n.id == "b"));
        assert_eq!(refs[1], RelatedRef::Unknown("ghost"));
        assert_eq!(refs[1].label(), "ghost");
        assert!(related(&store, a, RelationKind::Overlaps).is_empty());
    }
}
