//! Trait definitions for external interactions
//!
//! These traits define the boundary between the calculators in this crate
//! and the catalog that holds narratives. Implementations live in other crates.

use crate::{BeliefEdge, Narrative};

/// Read-only catalog of narratives and belief edges
///
/// Implemented by the infrastructure layer (narrative-store). Lookups never
/// fail: an unknown id is an expected outcome for dangling cross-references.
pub trait NarrativeStore {
    /// Get a narrative by id
    fn get_narrative(&self, id: &str) -> Option<&Narrative>;

    /// Narratives matching `filter`, in source insertion order
    fn list_narratives(&self, filter: &NarrativeFilter) -> Vec<&Narrative>;

    /// Every belief edge, including ones with dangling endpoints
    fn list_edges(&self) -> &[BeliefEdge];

    /// Every narrative, in source insertion order
    fn all_narratives(&self) -> Vec<&Narrative> {
        self.list_narratives(&NarrativeFilter::default())
    }
}

/// Filter criteria for listing narratives
///
/// Text matching is a case-insensitive substring match on name or summary.
/// Tag matching is exact. Both criteria must hold when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrativeFilter {
    /// Free-text search over name and summary
    pub text: Option<String>,

    /// Required tag
    pub tag: Option<String>,
}

impl NarrativeFilter {
    /// Filter on free text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tag: None,
        }
    }

    /// Filter on a tag only
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            text: None,
            tag: Some(tag.into()),
        }
    }

    /// Whether `narrative` satisfies this filter
    pub fn matches(&self, narrative: &Narrative) -> bool {
        let text_ok = match self.text.as_deref() {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                narrative.name.to_lowercase().contains(&query)
                    || narrative.summary.to_lowercase().contains(&query)
            }
        };

        let tag_ok = match self.tag.as_deref() {
            None => true,
            Some(tag) => narrative.has_tag(tag),
        };

        text_ok && tag_ok
    }
}
