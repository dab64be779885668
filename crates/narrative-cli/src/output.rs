//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::{DateTime, Utc};
use colored::*;
use narrative_domain::{
    concentration, AssetDriver, ConfidenceTrend, DashboardStats, DecayState, MarketOverview,
    Narrative, NarrativeExposure, Portfolio, RelationKind,
};
use narrative_store::{RelatedRef, ResolvedEdge};
use serde_json::json;
use std::fmt::Write;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

/// Signed percentage with no decimals, e.g. `+46%`
fn signed_pct(fraction: f64) -> String {
    format!("{:+.0}%", fraction * 100.0)
}

fn pct(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

fn trend_label(trend: ConfidenceTrend) -> &'static str {
    match trend {
        ConfidenceTrend::Up => "↑ up",
        ConfidenceTrend::Down => "↓ down",
        ConfidenceTrend::Flat => "→ flat",
    }
}

fn rounded(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a narrative listing.
    pub fn narratives(&self, narratives: &[&Narrative], now: DateTime<Utc>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = narratives
                    .iter()
                    .map(|n| {
                        json!({
                            "id": n.id,
                            "name": n.name,
                            "score": n.confidence.score,
                            "band": n.confidence.band().as_str(),
                            "trend": n.confidence.trend,
                            "decay_progress": DecayState::at(&n.decay, now).progress,
                            "tags": n.tags,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(ids(narratives.iter().map(|n| n.id.as_str()))),
            OutputFormat::Table => {
                if narratives.is_empty() {
                    return Ok(self.colorize("No narratives found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Confidence", "Band", "Trend", "Decay"]);
                for n in narratives {
                    let state = DecayState::at(&n.decay, now);
                    builder.push_record([
                        n.id.clone(),
                        n.name.clone(),
                        format!("{}%", n.confidence.score),
                        n.confidence.band().as_str().to_string(),
                        trend_label(n.confidence.trend).to_string(),
                        format!("{:.0}%", state.progress),
                    ]);
                }
                Ok(rounded(builder))
            }
        }
    }

    /// Format the full detail of one narrative.
    pub fn narrative_detail(
        &self,
        narrative: &Narrative,
        related: &[(RelationKind, Vec<RelatedRef<'_>>)],
        now: DateTime<Utc>,
    ) -> Result<String> {
        let state = DecayState::at(&narrative.decay, now);

        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::to_value(narrative)?;
                if let Some(object) = value.as_object_mut() {
                    object.insert("decay_progress".into(), json!(state.progress));
                    object.insert("fading".into(), json!(state.fading));
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(narrative.id.clone()),
            OutputFormat::Table => {
                let mut out = String::new();
                let _ = writeln!(out, "{}", self.colorize(&narrative.name, "cyan"));
                let _ = writeln!(out, "{}\n", narrative.summary);
                let _ = writeln!(
                    out,
                    "Confidence: {}% ({}, {})",
                    narrative.confidence.score,
                    narrative.confidence.band(),
                    trend_label(narrative.confidence.trend)
                );
                let _ = writeln!(
                    out,
                    "Decay:      {:.0}% ({:.1} of {} days since reinforced){}",
                    state.progress,
                    state.days_since_reinforced,
                    narrative.decay.half_life_days,
                    if state.fading { " - fading" } else { "" }
                );
                if !narrative.tags.is_empty() {
                    let _ = writeln!(out, "Tags:       {}", narrative.tags.join(", "));
                }

                if !narrative.assumptions.is_empty() {
                    let _ = writeln!(out, "\n{}", self.colorize("Assumptions", "magenta"));
                    for a in &narrative.assumptions {
                        let marker = if a.is_fragile() { "!" } else { " " };
                        let _ = writeln!(out, " {} [{:>3}% fragile] {}", marker, a.fragility_score, a.text);
                    }
                }

                for (title, evidence) in [
                    ("Supporting evidence", &narrative.supporting_evidence),
                    ("Contradicting evidence", &narrative.contradicting_evidence),
                ] {
                    if evidence.is_empty() {
                        continue;
                    }
                    let _ = writeln!(out, "\n{}", self.colorize(title, "magenta"));
                    for e in evidence {
                        let _ = writeln!(
                            out,
                            "  {} {} ({}, weight {:.2}): {}",
                            e.id,
                            e.timestamp.format("%Y-%m-%d"),
                            e.source,
                            e.weight,
                            e.description
                        );
                    }
                }

                if related.iter().any(|(_, refs)| !refs.is_empty()) {
                    let _ = writeln!(out, "\n{}", self.colorize("Related narratives", "magenta"));
                    for (kind, refs) in related {
                        if refs.is_empty() {
                            continue;
                        }
                        let labels: Vec<String> = refs
                            .iter()
                            .map(|r| match r {
                                RelatedRef::Known(n) => n.name.clone(),
                                RelatedRef::Unknown(id) => format!("{} (unknown)", id),
                            })
                            .collect();
                        let _ = writeln!(out, "  {}: {}", kind.as_str(), labels.join(", "));
                    }
                }

                if !narrative.affected_assets.is_empty() {
                    let _ = writeln!(out, "\n{}", self.colorize("Affected assets", "magenta"));
                    let mut builder = Builder::default();
                    builder.push_record(["Ticker", "Name", "Exposure"]);
                    for asset in &narrative.affected_assets {
                        builder.push_record([
                            asset.ticker.clone(),
                            asset.name.clone(),
                            signed_pct(asset.exposure_weight),
                        ]);
                    }
                    let _ = writeln!(out, "{}", rounded(builder));
                }

                if !narrative.history.is_empty() {
                    let _ = writeln!(out, "\n{}", self.colorize("History", "magenta"));
                    for snapshot in &narrative.history {
                        let _ = writeln!(
                            out,
                            "  {}  {:>3}%  {}",
                            snapshot.timestamp.format("%Y-%m-%d"),
                            snapshot.confidence_score,
                            snapshot.summary
                        );
                    }
                }

                Ok(out.trim_end().to_string())
            }
        }
    }

    /// Format decay progress for every narrative.
    pub fn decay(&self, narratives: &[&Narrative], now: DateTime<Utc>) -> Result<String> {
        let states: Vec<(&Narrative, DecayState)> = narratives
            .iter()
            .map(|n| (*n, DecayState::at(&n.decay, now)))
            .collect();

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = states
                    .iter()
                    .map(|(n, s)| {
                        json!({
                            "id": n.id,
                            "half_life_days": n.decay.half_life_days,
                            "days_since_reinforced": s.days_since_reinforced,
                            "progress": s.progress,
                            "fading": s.fading,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(ids(states.iter().filter(|(_, s)| s.fading).map(|(n, _)| n.id.as_str()))),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Half-life", "Since reinforced", "Progress", "Status"]);
                for (n, s) in &states {
                    let status = if s.fading {
                        self.colorize("fading", "red")
                    } else {
                        self.colorize("fresh", "green")
                    };
                    builder.push_record([
                        n.id.clone(),
                        format!("{}d", n.decay.half_life_days),
                        format!("{:.1}d", s.days_since_reinforced),
                        format!("{:.0}%", s.progress),
                        status,
                    ]);
                }
                Ok(rounded(builder))
            }
        }
    }

    /// Format a ranked exposure report.
    ///
    /// `top` limits the rows shown; concentration is over the first `k`.
    pub fn exposures(
        &self,
        portfolio: &Portfolio,
        exposures: &[NarrativeExposure<'_>],
        top: usize,
        k: usize,
    ) -> Result<String> {
        let concentrated = concentration(exposures, k);
        let counted = exposures.len().min(k);

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = exposures
                    .iter()
                    .map(|e| {
                        json!({
                            "narrative_id": e.narrative.id,
                            "name": e.narrative.name,
                            "exposure": e.exposure,
                            "direction": e.direction().as_str(),
                            "confidence": e.narrative.confidence.score,
                            "confidence_adjusted": e.confidence_adjusted(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "portfolio": portfolio.name,
                    "exposures": rows,
                    "concentration": { "k": k, "value": concentrated },
                }))?)
            }
            OutputFormat::Quiet => Ok(ids(exposures.iter().take(top).map(|e| e.narrative.id.as_str()))),
            OutputFormat::Table => {
                if exposures.is_empty() {
                    return Ok(self.colorize(
                        &format!("{} has no material narrative exposure.", portfolio.name),
                        "yellow",
                    ));
                }

                let mut out = String::new();
                let _ = writeln!(out, "{}", self.colorize(&portfolio.name, "cyan"));
                let _ = writeln!(
                    out,
                    "{}",
                    self.warning(&format!(
                        "Belief Concentration Warning: {} of your portfolio depends on {} narratives",
                        pct(concentrated),
                        counted
                    ))
                );

                let mut builder = Builder::default();
                builder.push_record(["#", "Narrative", "Exposure", "Direction", "Confidence", "Adjusted"]);
                for (rank, e) in exposures.iter().take(top).enumerate() {
                    builder.push_record([
                        (rank + 1).to_string(),
                        e.narrative.name.clone(),
                        signed_pct(e.exposure),
                        e.direction().to_string(),
                        format!("{}%", e.narrative.confidence.score),
                        signed_pct(e.confidence_adjusted()),
                    ]);
                }
                let _ = writeln!(out, "{}", rounded(builder));

                let leader = &exposures[0];
                let _ = writeln!(
                    out,
                    "{}",
                    self.info(&format!(
                        "Your portfolio assumes {} holds true. {} exposure to this {}% confidence narrative.",
                        leader.narrative.name,
                        pct(leader.exposure),
                        leader.narrative.confidence.score
                    ))
                );
                Ok(out.trim_end().to_string())
            }
        }
    }

    /// Format a portfolio's holdings.
    pub fn holdings(&self, portfolio: &Portfolio) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(portfolio)?),
            OutputFormat::Quiet => Ok(ids(portfolio.holdings.iter().map(|h| h.ticker.as_str()))),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Ticker", "Name", "Weight", "Shares", "Price"]);
                for h in &portfolio.holdings {
                    builder.push_record([
                        h.ticker.clone(),
                        h.name.clone(),
                        format!("{:.1}%", h.weight * 100.0),
                        h.shares.map(|s| s.to_string()).unwrap_or_default(),
                        h.current_price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                    ]);
                }

                let mut out = format!("{} ({})\n", self.colorize(&portfolio.name, "cyan"), portfolio.id);
                out.push_str(&rounded(builder));
                let _ = write!(
                    out,
                    "\n{} holdings, total weight {:.1}%",
                    portfolio.holdings.len(),
                    portfolio.total_weight() * 100.0
                );
                Ok(out)
            }
        }
    }

    /// Format belief graph edges.
    pub fn edges(&self, edges: &[ResolvedEdge<'_>]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = edges
                    .iter()
                    .map(|e| {
                        json!({
                            "id": e.edge.id,
                            "from": e.from.id,
                            "to": e.to.id,
                            "relationship": e.edge.relationship,
                            "strength": e.edge.strength,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(ids(edges.iter().map(|e| e.edge.id.as_str()))),
            OutputFormat::Table => {
                if edges.is_empty() {
                    return Ok(self.colorize("No belief edges.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "From", "Relationship", "To", "Strength"]);
                for e in edges {
                    builder.push_record([
                        e.edge.id.clone(),
                        e.from.name.clone(),
                        e.edge.relationship.to_string(),
                        e.to.name.clone(),
                        format!("{:.2}", e.edge.strength),
                    ]);
                }
                Ok(rounded(builder))
            }
        }
    }

    /// Format the market overview.
    pub fn overview(&self, stats: &DashboardStats, overview: &MarketOverview<'_>, tags: &[&str]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "stats": stats,
                "dominant": overview.dominant.iter().map(|n| &n.id).collect::<Vec<_>>(),
                "rising": overview.rising.iter().map(|n| &n.id).collect::<Vec<_>>(),
                "fading": overview.fading.iter().map(|n| &n.id).collect::<Vec<_>>(),
                "tags": tags,
            }))?),
            OutputFormat::Quiet => Ok(ids(overview.dominant.iter().map(|n| n.id.as_str()))),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Narratives", "Avg confidence", "Rising", "Fading", "High fragility", "Decaying"]);
                builder.push_record([
                    stats.narratives.to_string(),
                    format!("{}%", stats.average_confidence),
                    stats.rising.to_string(),
                    stats.fading.to_string(),
                    stats.high_fragility.to_string(),
                    stats.decaying.to_string(),
                ]);

                let mut out = rounded(builder);
                for (title, color, list) in [
                    ("Dominant", "cyan", &overview.dominant),
                    ("Rising", "green", &overview.rising),
                    ("Fading", "red", &overview.fading),
                ] {
                    let listed: Vec<&str> = list.iter().map(|n| n.name.as_str()).collect();
                    let body = if listed.is_empty() { "-".to_string() } else { listed.join(", ") };
                    let _ = write!(out, "\n{} {}", self.colorize(&format!("{}:", title), color), body);
                }
                if !tags.is_empty() {
                    let _ = write!(out, "\nTags: {}", tags.join(", "));
                }
                Ok(out)
            }
        }
    }

    /// Format the narratives driving one asset.
    pub fn asset(&self, ticker: &str, drivers: &[AssetDriver<'_>]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = drivers
                    .iter()
                    .map(|d| {
                        json!({
                            "narrative_id": d.narrative.id,
                            "name": d.narrative.name,
                            "exposure_weight": d.exposure_weight,
                            "direction": d.direction().as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({ "ticker": ticker, "drivers": rows }))?)
            }
            OutputFormat::Quiet => Ok(ids(drivers.iter().map(|d| d.narrative.id.as_str()))),
            OutputFormat::Table => {
                if drivers.is_empty() {
                    return Ok(self.colorize(&format!("No narrative names {}.", ticker), "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Narrative", "Weight", "Direction", "Confidence"]);
                for d in drivers {
                    builder.push_record([
                        d.narrative.name.clone(),
                        signed_pct(d.exposure_weight),
                        d.direction().to_string(),
                        format!("{}%", d.narrative.confidence.score),
                    ]);
                }
                Ok(format!("{}\n{}", self.colorize(ticker, "cyan"), rounded(builder)))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}
