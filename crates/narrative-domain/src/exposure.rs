//! Exposure aggregation
//!
//! For a portfolio P and a narrative N:
//!
//! ```text
//! exposure(P, N) = Σ h.weight * N.exposure_weight(h.ticker)
//! ```
//!
//! Tickers the narrative does not name contribute 0. The sign gives the
//! direction of the dependency; the magnitude is used for ranking.

use crate::narrative::Narrative;
use crate::portfolio::Portfolio;
use crate::traits::NarrativeStore;
use std::fmt;

/// Magnitude at or below which an exposure is not reported
pub const MATERIALITY_THRESHOLD: f64 = 0.01;

/// Rounding slack for products like `0.1 * 0.1` landing just above the threshold
const MATERIALITY_TOLERANCE: f64 = 1e-9;

/// Whether a magnitude is strictly above [`MATERIALITY_THRESHOLD`]
pub fn is_material(magnitude: f64) -> bool {
    magnitude - MATERIALITY_THRESHOLD > MATERIALITY_TOLERANCE
}

/// Which way an asset or portfolio leans on a narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Benefits if the narrative holds
    Bullish,
    /// Hurt if the narrative holds
    Bearish,
    /// No net dependency
    Neutral,
}

impl Direction {
    /// Direction of a signed value
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Direction::Bullish
        } else if value < 0.0 {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }

    /// Get the direction name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "bullish",
            Direction::Bearish => "bearish",
            Direction::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portfolio's exposure to one narrative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrativeExposure<'a> {
    /// The narrative
    pub narrative: &'a Narrative,

    /// Signed exposure
    pub exposure: f64,
}

impl NarrativeExposure<'_> {
    /// Absolute exposure
    pub fn magnitude(&self) -> f64 {
        self.exposure.abs()
    }

    /// Direction of the exposure
    pub fn direction(&self) -> Direction {
        Direction::of(self.exposure)
    }

    /// Exposure scaled by the narrative's confidence fraction
    pub fn confidence_adjusted(&self) -> f64 {
        self.exposure * self.narrative.confidence.fraction()
    }
}

/// Signed exposure of `portfolio` to `narrative`
pub fn exposure(portfolio: &Portfolio, narrative: &Narrative) -> f64 {
    portfolio
        .holdings
        .iter()
        .map(|h| h.weight * narrative.exposure_weight(&h.ticker))
        .sum()
}

/// Material exposures across every narrative in `store`
///
/// Ordered by descending magnitude; ties keep store order. Entries whose
/// magnitude is at or below [`MATERIALITY_THRESHOLD`] are excluded.
pub fn list_exposures<'a, S>(portfolio: &Portfolio, store: &'a S) -> Vec<NarrativeExposure<'a>>
where
    S: NarrativeStore + ?Sized,
{
    let mut exposures: Vec<NarrativeExposure<'a>> = store
        .all_narratives()
        .into_iter()
        .map(|narrative| NarrativeExposure {
            narrative,
            exposure: exposure(portfolio, narrative),
        })
        .filter(|e| is_material(e.magnitude()))
        .collect();

    exposures.sort_by(|a, b| b.magnitude().total_cmp(&a.magnitude()));
    exposures
}

/// Sum of the `k` largest exposure magnitudes
pub fn concentration(exposures: &[NarrativeExposure<'_>], k: usize) -> f64 {
    let mut magnitudes: Vec<f64> = exposures.iter().map(NarrativeExposure::magnitude).collect();
    magnitudes.sort_by(|a, b| b.total_cmp(a));
    magnitudes.into_iter().take(k).sum()
}

/// How one narrative drives a single asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetDriver<'a> {
    /// The narrative
    pub narrative: &'a Narrative,

    /// Signed exposure weight of the asset
    pub exposure_weight: f64,
}

impl AssetDriver<'_> {
    /// Direction of the driver
    pub fn direction(&self) -> Direction {
        Direction::of(self.exposure_weight)
    }

    /// Narratives in `store` naming `ticker`, by descending |weight|
    pub fn for_ticker<'a, S>(store: &'a S, ticker: &str) -> Vec<AssetDriver<'a>>
    where
        S: NarrativeStore + ?Sized,
    {
        let mut drivers: Vec<AssetDriver<'a>> = store
            .all_narratives()
            .into_iter()
            .filter_map(|narrative| {
                narrative
                    .affected_assets
                    .iter()
                    .find(|a| a.ticker == ticker)
                    .map(|a| AssetDriver {
                        narrative,
                        exposure_weight: a.exposure_weight,
                    })
            })
            .collect();

        drivers.sort_by(|a, b| b.exposure_weight.abs().total_cmp(&a.exposure_weight.abs()));
        drivers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetExposure, BeliefEdge, Confidence, ConfidenceTrend, Decay, Holding, NarrativeFilter};
    use chrono::Utc;

    #[derive(Debug)]
    struct VecStore(Vec<Narrative>);

    impl NarrativeStore for VecStore {
        fn get_narrative(&self, id: &str) -> Option<&Narrative> {
            self.0.iter().find(|n| n.id == id)
        }

        fn list_narratives(&self, filter: &NarrativeFilter) -> Vec<&Narrative> {
            self.0.iter().filter(|n| filter.matches(n)).collect()
        }

        fn list_edges(&self) -> &[BeliefEdge] {
            &[]
        }
    }

    fn narrative(id: &str, score: u8, assets: &[(&str, f64)]) -> Narrative {
        let now = Utc::now();
        let mut n = Narrative::new(
            id,
            id,
            "",
            Confidence::new(score, ConfidenceTrend::Flat, now).unwrap(),
            Decay::new(30.0, now),
            now,
        );
        for (ticker, w) in assets {
            n = n.with_asset(AssetExposure::new(*ticker, *ticker, *w));
        }
        n
    }

    fn portfolio(holdings: &[(&str, f64)]) -> Portfolio {
        Portfolio::new(
            "p",
            "P",
            holdings.iter().map(|(t, w)| Holding::new(*t, *t, *w)).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn test_single_overlap() {
        let n = narrative("ai-capex-supercycle", 78, &[("NVDA", 0.95), ("AMD", 0.75)]);
        let p = portfolio(&[("NVDA", 0.20), ("TLT", 0.10)]);
        assert!((exposure(&p, &n) - 0.19).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap_is_zero() {
        let n = narrative("n", 50, &[("NVDA", 0.95)]);
        let p = portfolio(&[("TLT", 0.5), ("SPY", 0.5)]);
        assert_eq!(exposure(&p, &n), 0.0);
    }

    #[test]
    fn test_signed_exposure_nets_out() {
        let n = narrative("bubble", 45, &[("NVDA", -0.85), ("XLV", 0.5)]);
        let p = portfolio(&[("NVDA", 0.2), ("XLV", 0.1)]);
        let e = exposure(&p, &n);
        assert!((e - (-0.17 + 0.05)).abs() < 1e-12);
        let ne = NarrativeExposure { narrative: &n, exposure: e };
        assert_eq!(ne.direction(), Direction::Bearish);
    }

    #[test]
    fn test_empty_portfolio_lists_nothing() {
        let store = VecStore(vec![narrative("n", 50, &[("NVDA", 0.95)])]);
        assert!(list_exposures(&portfolio(&[]), &store).is_empty());
    }

    #[test]
    fn test_ranking_by_magnitude() {
        let store = VecStore(vec![
            narrative("small", 50, &[("A", 0.1)]),
            narrative("bearish", 50, &[("A", -0.9)]),
            narrative("mid", 50, &[("A", 0.5)]),
        ]);
        let list = list_exposures(&portfolio(&[("A", 1.0)]), &store);
        let ids: Vec<&str> = list.iter().map(|e| e.narrative.id.as_str()).collect();
        assert_eq!(ids, vec!["bearish", "mid", "small"]);
        assert!(list[0].exposure < 0.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let store = VecStore(vec![
            narrative("at", 50, &[("A", 0.01)]),
            narrative("above", 50, &[("A", 0.011)]),
        ]);
        let list = list_exposures(&portfolio(&[("A", 1.0)]), &store);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].narrative.id, "above");
    }

    #[test]
    fn test_threshold_product_with_rounding_error() {
        let store = VecStore(vec![narrative("tenth", 50, &[("A", 0.1)])]);
        let p = portfolio(&[("A", 0.1)]);
        assert!(exposure(&p, &store.0[0]) > MATERIALITY_THRESHOLD);
        assert!(list_exposures(&p, &store).is_empty());
        assert!(is_material(0.0101));
    }

    #[test]
    fn test_concentration_top_k() {
        let store = VecStore(vec![
            narrative("a", 50, &[("A", 0.5)]),
            narrative("b", 50, &[("A", -0.3)]),
            narrative("c", 50, &[("A", 0.2)]),
            narrative("d", 50, &[("A", 0.1)]),
        ]);
        let list = list_exposures(&portfolio(&[("A", 1.0)]), &store);
        assert!((concentration(&list, 3) - 1.0).abs() < 1e-12);
        assert!((concentration(&list, 10) - 1.1).abs() < 1e-12);
        assert_eq!(concentration(&list, 0), 0.0);
    }

    #[test]
    fn test_confidence_adjusted() {
        let n = narrative("n", 80, &[]);
        let e = NarrativeExposure { narrative: &n, exposure: 0.5 };
        assert!((e.confidence_adjusted() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_asset_drivers() {
        let store = VecStore(vec![
            narrative("capex", 78, &[("NVDA", 0.95)]),
            narrative("energy", 71, &[("VST", 0.85)]),
            narrative("bubble", 45, &[("NVDA", -0.85), ("QQQ", -0.7)]),
        ]);
        let drivers = AssetDriver::for_ticker(&store, "NVDA");
        assert_eq!(drivers.len(), 2);
        assert_eq!(drivers[0].narrative.id, "capex");
        assert_eq!(drivers[0].direction(), Direction::Bullish);
        assert_eq!(drivers[1].direction(), Direction::Bearish);
        assert!(AssetDriver::for_ticker(&store, "AAPL").is_empty());
    }
}
