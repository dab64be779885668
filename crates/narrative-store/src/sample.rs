//! Bundled sample catalog and portfolio
//!
//! Timestamps are expressed as "N days before `now`" so that decay stays
//! meaningful whenever the sample is loaded.

use crate::Catalog;
use chrono::{DateTime, Duration, Utc};
use narrative_domain::{
    AssetExposure, Assumption, BeliefEdge, BeliefRelationship, Confidence, ConfidenceTrend, Decay,
    Evidence, Holding, Narrative, NarrativeSnapshot, Portfolio, RelatedNarratives,
};

/// Id of the sample portfolio
pub const SAMPLE_PORTFOLIO_ID: &str = "portfolio-1";

struct Clock(DateTime<Utc>);

impl Clock {
    fn ago(&self, days: i64) -> DateTime<Utc> {
        self.0 - Duration::days(days)
    }

    fn narrative(
        &self,
        id: &str,
        name: &str,
        summary: &str,
        (score, trend, updated_days_ago): (u8, ConfidenceTrend, i64),
        (half_life_days, reinforced_days_ago): (f64, i64),
        created_days_ago: i64,
    ) -> Narrative {
        Narrative::new(
            id,
            name,
            summary,
            Confidence {
                score,
                trend,
                last_updated: self.ago(updated_days_ago),
            },
            Decay::new(half_life_days, self.ago(reinforced_days_ago)),
            self.ago(created_days_ago),
        )
    }

    fn evidence(&self, id: &str, source: &str, description: &str, days_ago: i64, weight: f64) -> Evidence {
        Evidence::new(id, source, description, self.ago(days_ago), weight)
    }

    fn snapshot(&self, days_ago: i64, confidence_score: u8, summary: &str) -> NarrativeSnapshot {
        NarrativeSnapshot {
            timestamp: self.ago(days_ago),
            confidence_score,
            summary: summary.to_string(),
        }
    }
}

fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn related(reinforces: &[&str], conflicts: &[&str], overlaps: &[&str]) -> RelatedNarratives {
    RelatedNarratives {
        reinforces: owned(reinforces),
        conflicts: owned(conflicts),
        overlaps: owned(overlaps),
    }
}

fn edge(id: &str, from: &str, to: &str, relationship: BeliefRelationship, strength: f64) -> BeliefEdge {
    BeliefEdge {
        id: id.to_string(),
        from_narrative_id: from.to_string(),
        to_narrative_id: to.to_string(),
        relationship,
        strength,
    }
}

/// Six narratives and six belief edges describing a 2025 market
pub fn sample_catalog(now: DateTime<Utc>) -> Catalog {
    let c = Clock(now);

    let ai_capex = c
        .narrative(
            "ai-capex-supercycle",
            "AI Capex Supercycle",
            "Massive capital expenditure cycle driven by AI infrastructure buildout. Hyperscalers \
             spending unprecedented amounts on GPUs, data centers, and AI infrastructure. Similar \
             to previous tech infrastructure cycles but potentially larger in scale.",
            (78, ConfidenceTrend::Up, 1),
            (30.0, 1),
            90,
        )
        .with_assumption(Assumption::new("a1", "AI model scaling continues to yield improvements", 35))
        .with_assumption(Assumption::new("a2", "Enterprise AI adoption accelerates", 25))
        .with_assumption(Assumption::new("a3", "GPU supply constraints persist", 45))
        .with_assumption(Assumption::new("a4", "No major AI regulation impacts spending", 55))
        .with_support(c.evidence("e1", "NVIDIA Earnings", "Data center revenue up 400% YoY", 14, 0.9))
        .with_support(c.evidence("e2", "Microsoft Capex", "Azure AI spending guidance raised 30%", 7, 0.85))
        .with_support(c.evidence("e3", "Meta AI Plans", "Zuckerberg commits to $40B AI infrastructure", 21, 0.8))
        .with_contradiction(c.evidence(
            "c1",
            "Goldman Research",
            "Questions ROI on AI spending at current levels",
            5,
            0.4,
        ))
        .with_related(related(
            &["semiconductor-shortage", "cloud-growth-reacceleration"],
            &["tech-valuation-bubble"],
            &["energy-demand-surge"],
        ))
        .with_asset(AssetExposure::new("NVDA", "NVIDIA", 0.95))
        .with_asset(AssetExposure::new("AMD", "AMD", 0.75))
        .with_asset(AssetExposure::new("MSFT", "Microsoft", 0.6))
        .with_asset(AssetExposure::new("GOOGL", "Alphabet", 0.55))
        .with_asset(AssetExposure::new("AVGO", "Broadcom", 0.7))
        .with_snapshot(c.snapshot(30, 65, "Early signs of sustained AI investment"))
        .with_snapshot(c.snapshot(14, 72, "Q4 earnings confirm thesis"))
        .with_tags(["technology", "AI", "infrastructure", "semiconductors"]);

    let soft_landing = c
        .narrative(
            "us-soft-landing",
            "US Soft Landing",
            "The Federal Reserve successfully navigates inflation back to target without causing \
             a recession. Employment remains strong, consumer spending resilient, and inflation \
             gradually moderates.",
            (62, ConfidenceTrend::Flat, 2),
            (14.0, 2),
            180,
        )
        .with_assumption(Assumption::new("a1", "Inflation continues gradual decline", 40))
        .with_assumption(Assumption::new("a2", "Labor market remains resilient", 35))
        .with_assumption(Assumption::new("a3", "No external shocks (geopolitical, energy)", 60))
        .with_assumption(Assumption::new("a4", "Fed executes rate cuts appropriately", 45))
        .with_support(c.evidence("e1", "BLS Employment", "Unemployment steady at 3.7%", 10, 0.7))
        .with_support(c.evidence("e2", "CPI Report", "Core inflation at 3.2%, continuing downtrend", 15, 0.75))
        .with_contradiction(c.evidence("c1", "Regional Fed Survey", "Manufacturing weakness spreading", 8, 0.35))
        .with_contradiction(c.evidence(
            "c2",
            "Credit Card Data",
            "Delinquencies rising among lower income",
            12,
            0.4,
        ))
        .with_related(related(
            &["consumer-resilience"],
            &["recession-imminent", "inflation-sticky"],
            &["fed-rate-cuts"],
        ))
        .with_asset(AssetExposure::new("SPY", "S&P 500 ETF", 0.6))
        .with_asset(AssetExposure::new("XLY", "Consumer Discretionary", 0.7))
        .with_asset(AssetExposure::new("XLF", "Financials", 0.5))
        .with_snapshot(c.snapshot(60, 55, "Uncertainty about inflation path"))
        .with_snapshot(c.snapshot(30, 60, "Improving economic data"))
        .with_tags(["macro", "fed", "economy", "inflation"]);

    let tech_bubble = c
        .narrative(
            "tech-valuation-bubble",
            "Tech Valuation Bubble",
            "Current technology valuations, particularly in AI-related names, are disconnected \
             from fundamentals. Echoes of dot-com bubble with excessive optimism and speculative \
             positioning.",
            (45, ConfidenceTrend::Down, 3),
            (21.0, 10),
            120,
        )
        .with_assumption(Assumption::new("a1", "Valuation multiples are historically extreme", 30))
        .with_assumption(Assumption::new("a2", "AI revenue growth will disappoint vs expectations", 65))
        .with_assumption(Assumption::new("a3", "Rate normalization will compress multiples", 50))
        .with_support(c.evidence("e1", "Shiller PE", "CAPE ratio at 95th percentile", 30, 0.6))
        .with_support(c.evidence(
            "e2",
            "IPO Market",
            "Unprofitable tech IPOs at elevated valuations",
            45,
            0.4,
        ))
        .with_contradiction(c.evidence("c1", "Earnings Growth", "Mag 7 delivering 25%+ earnings growth", 14, 0.7))
        .with_contradiction(c.evidence("c2", "Cash Flow", "Big tech generating record free cash flow", 20, 0.65))
        .with_related(related(
            &["rotation-to-value"],
            &["ai-capex-supercycle", "tech-earnings-strength"],
            &[],
        ))
        .with_asset(AssetExposure::new("QQQ", "Nasdaq 100 ETF", -0.7))
        .with_asset(AssetExposure::new("NVDA", "NVIDIA", -0.85))
        .with_asset(AssetExposure::new("TSLA", "Tesla", -0.8))
        .with_snapshot(c.snapshot(90, 55, "Concerns about mega-cap concentration"))
        .with_snapshot(c.snapshot(45, 50, "Strong earnings reducing bubble concerns"))
        .with_tags(["valuation", "risk", "technology", "bubble"]);

    let energy = c
        .narrative(
            "energy-demand-surge",
            "Energy Demand Surge",
            "AI data centers and electrification are driving unprecedented electricity demand \
             growth. Utility capex cycles accelerating, with implications for power generation, \
             grid infrastructure, and energy prices.",
            (71, ConfidenceTrend::Up, 2),
            (45.0, 2),
            60,
        )
        .with_assumption(Assumption::new("a1", "AI data centers consume massive power", 20))
        .with_assumption(Assumption::new("a2", "Grid infrastructure requires major upgrades", 25))
        .with_assumption(Assumption::new("a3", "Renewable transition continues", 40))
        .with_support(c.evidence("e1", "EIA Report", "Data center electricity demand up 30% YoY", 20, 0.8))
        .with_support(c.evidence("e2", "Utility Guidance", "Major utilities raising capex forecasts", 14, 0.75))
        .with_contradiction(c.evidence(
            "c1",
            "Efficiency Gains",
            "New GPU architectures more power efficient",
            30,
            0.3,
        ))
        .with_related(related(&["ai-capex-supercycle"], &[], &["clean-energy-transition"]))
        .with_asset(AssetExposure::new("VST", "Vistra", 0.85))
        .with_asset(AssetExposure::new("CEG", "Constellation Energy", 0.8))
        .with_asset(AssetExposure::new("NEE", "NextEra Energy", 0.6))
        .with_tags(["energy", "utilities", "AI", "infrastructure"]);

    let rate_cuts = c
        .narrative(
            "fed-rate-cuts",
            "Fed Rate Cuts 2025",
            "The Federal Reserve will cut rates multiple times in 2025 as inflation normalizes, \
             shifting from restrictive to neutral policy stance. Market pricing 3-4 cuts.",
            (58, ConfidenceTrend::Down, 1),
            (14.0, 5),
            45,
        )
        .with_assumption(Assumption::new("a1", "Inflation reaches 2% target", 50))
        .with_assumption(Assumption::new("a2", "No reacceleration in economy", 45))
        .with_assumption(Assumption::new("a3", "Fed follows data, not politics", 35))
        .with_support(c.evidence("e1", "Fed Dot Plot", "Median forecast shows 75bps cuts", 30, 0.7))
        .with_support(c.evidence("e2", "Fed Speakers", "Dovish pivot in December communications", 25, 0.6))
        .with_contradiction(c.evidence("c1", "January CPI", "Hot inflation print raises doubts", 5, 0.55))
        .with_contradiction(c.evidence("c2", "Jobs Report", "Strong payrolls suggest no urgency to cut", 10, 0.5))
        .with_related(related(&["us-soft-landing"], &["inflation-sticky"], &[]))
        .with_asset(AssetExposure::new("TLT", "Long-Term Treasury ETF", 0.9))
        .with_asset(AssetExposure::new("XLF", "Financials", -0.4))
        .with_asset(AssetExposure::new("XLU", "Utilities", 0.5))
        .with_tags(["macro", "fed", "rates", "bonds"]);

    let china = c
        .narrative(
            "china-stimulus",
            "China Stimulus Pivot",
            "Chinese authorities are shifting to aggressive stimulus to combat deflation and \
             property crisis. Policy pivot could reignite global growth and commodity demand.",
            (52, ConfidenceTrend::Up, 3),
            (21.0, 3),
            30,
        )
        .with_assumption(Assumption::new("a1", "CCP prioritizes growth over deleveraging", 40))
        .with_assumption(Assumption::new("a2", "Stimulus transmission works effectively", 55))
        .with_assumption(Assumption::new("a3", "Property sector stabilizes", 65))
        .with_support(c.evidence("e1", "PBOC Policy", "Rate cuts and RRR reductions announced", 10, 0.7))
        .with_support(c.evidence("e2", "Fiscal Policy", "Local government debt swap program expanded", 15, 0.6))
        .with_contradiction(c.evidence("c1", "Property Data", "Home sales still declining 20% YoY", 8, 0.5))
        .with_contradiction(c.evidence("c2", "Deflation Print", "CPI negative for 4th straight month", 12, 0.45))
        .with_related(related(&["commodity-supercycle"], &["china-structural-decline"], &[]))
        .with_asset(AssetExposure::new("FXI", "China Large Cap ETF", 0.9))
        .with_asset(AssetExposure::new("BABA", "Alibaba", 0.8))
        .with_asset(AssetExposure::new("FCX", "Freeport McMoran", 0.6))
        .with_tags(["china", "stimulus", "macro", "commodities"]);

    use BeliefRelationship::{Conflicts, Reinforces};
    let edges = vec![
        edge("e1", "ai-capex-supercycle", "energy-demand-surge", Reinforces, 0.85),
        edge("e2", "ai-capex-supercycle", "tech-valuation-bubble", Conflicts, 0.6),
        edge("e3", "us-soft-landing", "fed-rate-cuts", Reinforces, 0.7),
        edge("e4", "fed-rate-cuts", "tech-valuation-bubble", Conflicts, 0.5),
        edge("e5", "china-stimulus", "us-soft-landing", Reinforces, 0.4),
        edge("e6", "energy-demand-surge", "fed-rate-cuts", Conflicts, 0.35),
    ];

    Catalog {
        narratives: vec![ai_capex, soft_landing, tech_bubble, energy, rate_cuts, china],
        edges,
    }
}

/// The "Growth & Tech Focus" sample portfolio
pub fn sample_portfolio(now: DateTime<Utc>) -> Portfolio {
    let holdings = [
        ("NVDA", "NVIDIA", 0.20),
        ("MSFT", "Microsoft", 0.15),
        ("GOOGL", "Alphabet", 0.12),
        ("AMD", "AMD", 0.08),
        ("AVGO", "Broadcom", 0.08),
        ("VST", "Vistra", 0.07),
        ("CEG", "Constellation Energy", 0.06),
        ("SPY", "S&P 500 ETF", 0.10),
        ("TLT", "Long-Term Treasury", 0.08),
        ("BABA", "Alibaba", 0.06),
    ]
    .into_iter()
    .map(|(ticker, name, weight)| Holding::new(ticker, name, weight))
    .collect();

    let mut portfolio = Portfolio::new(
        SAMPLE_PORTFOLIO_ID,
        "Growth & Tech Focus",
        holdings,
        now - Duration::days(90),
    );
    portfolio.updated_at = now - Duration::days(1);
    portfolio
}
