//! Narrative Domain Layer
//!
//! This crate contains the data model and the pure computations that every
//! other layer reads from. It performs no I/O: callers hand in a store
//! snapshot, a portfolio and an explicit `now`.
//!
//! ## Key Concepts
//!
//! - **Narrative**: A modeled market belief with confidence, evidence and asset sensitivities
//! - **Belief Edge**: Directed relation (reinforces / conflicts / depends_on) between narratives
//! - **Portfolio**: A list of ticker/weight holdings
//! - **Decay**: Staleness of a narrative's last reinforcement relative to its half-life
//! - **Exposure**: Signed sensitivity of a portfolio to a narrative being true
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Storage implementations live in `narrative-store`
//! - The `NarrativeStore` trait is the seam between the two

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod decay;
pub mod edge;
pub mod error;
pub mod evidence;
pub mod exposure;
pub mod narrative;
pub mod overview;
pub mod portfolio;
pub mod traits;

// Re-exports for convenience
pub use confidence::{Confidence, ConfidenceBand, ConfidenceTrend};
pub use decay::{decay_progress, is_fading, DecayState, FADING_THRESHOLD};
pub use edge::{BeliefEdge, BeliefRelationship};
pub use error::DomainError;
pub use evidence::Evidence;
pub use exposure::{
    concentration, exposure, is_material, list_exposures, AssetDriver, Direction, NarrativeExposure,
    MATERIALITY_THRESHOLD,
};
pub use narrative::{
    AssetExposure, Assumption, Decay, Narrative, NarrativeId, NarrativeSnapshot,
    RelatedNarratives, RelationKind,
};
pub use overview::{all_tags, DashboardStats, MarketOverview};
pub use portfolio::{Holding, Portfolio};
pub use traits::{NarrativeFilter, NarrativeStore};
