//! Market overview and dashboard statistics

use crate::confidence::ConfidenceTrend;
use crate::decay::is_fading;
use crate::narrative::Narrative;
use crate::traits::NarrativeStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Narratives grouped the way the overview screen shows them
///
/// Each list keeps store order.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOverview<'a> {
    /// Narratives with a high-band score
    pub dominant: Vec<&'a Narrative>,

    /// Narratives trending up
    pub rising: Vec<&'a Narrative>,

    /// Narratives trending down
    pub fading: Vec<&'a Narrative>,
}

impl<'a> MarketOverview<'a> {
    /// Score at or above which a narrative is dominant
    pub const DOMINANT_FLOOR: u8 = 70;

    /// Build the overview for every narrative in `store`
    pub fn build<S>(store: &'a S) -> Self
    where
        S: NarrativeStore + ?Sized,
    {
        let all = store.all_narratives();
        let with_trend = |trend: ConfidenceTrend| -> Vec<&'a Narrative> {
            all.iter()
                .copied()
                .filter(|n| n.confidence.trend == trend)
                .collect()
        };

        Self {
            dominant: all
                .iter()
                .copied()
                .filter(|n| n.confidence.score >= Self::DOMINANT_FLOOR)
                .collect(),
            rising: with_trend(ConfidenceTrend::Up),
            fading: with_trend(ConfidenceTrend::Down),
        }
    }
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Number of narratives
    pub narratives: usize,

    /// Mean confidence score, rounded; 0 for an empty store
    pub average_confidence: u8,

    /// Narratives trending up
    pub rising: usize,

    /// Narratives trending down
    pub fading: usize,

    /// Narratives with at least one fragile assumption
    pub high_fragility: usize,

    /// Narratives whose decay progress exceeds the fading threshold at `now`
    pub decaying: usize,
}

impl DashboardStats {
    /// Compute the statistics for `store` at `now`
    pub fn compute<S>(store: &S, now: DateTime<Utc>) -> Self
    where
        S: NarrativeStore + ?Sized,
    {
        let all = store.all_narratives();
        let trending = |trend: ConfidenceTrend| {
            all.iter()
                .filter(|n| n.confidence.trend == trend)
                .count()
        };

        let average_confidence = if all.is_empty() {
            0
        } else {
            let total: u32 = all.iter().map(|n| u32::from(n.confidence.score)).sum();
            (f64::from(total) / all.len() as f64).round() as u8
        };

        Self {
            narratives: all.len(),
            average_confidence,
            rising: trending(ConfidenceTrend::Up),
            fading: trending(ConfidenceTrend::Down),
            high_fragility: all.iter().filter(|n| n.has_fragile_assumption()).count(),
            decaying: all.iter().filter(|n| is_fading(n, now)).count(),
        }
    }
}

/// Unique tags across the store, in first-seen order
pub fn all_tags<S>(store: &S) -> Vec<&str>
where
    S: NarrativeStore + ?Sized,
{
    let mut tags: Vec<&str> = Vec::new();
    for narrative in store.all_narratives() {
        for tag in &narrative.tags {
            if !tags.contains(&tag.as_str()) {
                tags.push(tag);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Assumption, BeliefEdge, Confidence, Decay, NarrativeFilter};
    use chrono::{Duration, TimeZone};

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

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn narrative(id: &str, score: u8, trend: ConfidenceTrend, reinforced_days_ago: i64) -> Narrative {
        Narrative::new(
            id,
            id,
            "",
            Confidence::new(score, trend, now()).unwrap(),
            Decay::new(10.0, now() - Duration::days(reinforced_days_ago)),
            now() - Duration::days(60),
        )
    }

    fn store() -> VecStore {
        VecStore(vec![
            narrative("a", 78, ConfidenceTrend::Up, 1).with_tags(["ai", "tech"]),
            narrative("b", 62, ConfidenceTrend::Flat, 8)
                .with_assumption(Assumption::new("b1", "x", 65))
                .with_tags(["macro"]),
            narrative("c", 45, ConfidenceTrend::Down, 2).with_tags(["tech", "risk"]),
            narrative("d", 70, ConfidenceTrend::Down, 20)
                .with_assumption(Assumption::new("d1", "y", 50)),
        ])
    }

    #[test]
    fn test_overview_groups() {
        let store = store();
        let overview = MarketOverview::build(&store);
        let ids = |v: &[&Narrative]| v.iter().map(|n| n.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&overview.dominant), vec!["a", "d"]);
        assert_eq!(ids(&overview.rising), vec!["a"]);
        assert_eq!(ids(&overview.fading), vec!["c", "d"]);
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = DashboardStats::compute(&store(), now());
        assert_eq!(stats.narratives, 4);
        // (78 + 62 + 45 + 70) / 4 = 63.75
        assert_eq!(stats.average_confidence, 64);
        assert_eq!(stats.rising, 1);
        assert_eq!(stats.fading, 2);
        assert_eq!(stats.high_fragility, 1);
        // 8/10 and 20/10 exceed half
        assert_eq!(stats.decaying, 2);
    }

    #[test]
    fn test_dashboard_stats_empty_store() {
        let stats = DashboardStats::compute(&VecStore(vec![]), now());
        assert_eq!(stats.narratives, 0);
        assert_eq!(stats.average_confidence, 0);
    }

    #[test]
    fn test_all_tags_first_seen_order() {
        assert_eq!(all_tags(&store()), vec!["ai", "tech", "macro", "risk"]);
    }
}
