//! Prompt construction for the assistant and the explainers

use crate::ChatMessage;
use narrative_domain::{
    AssetDriver, AssetExposure, BeliefEdge, ConfidenceTrend, Evidence, Narrative, NarrativeStore,
};
use std::fmt::Write;

/// System prompt for one-off explanations
pub const ANALYST_SYSTEM_PROMPT: &str = "You are a market narrative intelligence analyst. \
You provide detailed, analytical explanations about market narratives and their effects on assets. \
Be specific, reference real market dynamics, and avoid vague generalities. Use markdown formatting.";

const ASSISTANT_INTRO: &str = "You are a Narrative Intelligence Assistant for a market analysis platform. \
You help investors understand market narratives - the collective beliefs that drive asset prices.

Your expertise:
- Identifying which narratives are driving specific assets
- Explaining belief conflicts and reinforcements between narratives
- Analyzing portfolio exposure to narrative risk
- Detecting narrative fragility and assumption weaknesses
- Tracking confidence decay and narrative lifecycles";

const ASSISTANT_RULES: &str = "Rules:
- Be analytical and nuanced, never promotional
- Acknowledge uncertainty explicitly
- Reference specific data points when possible
- Think in terms of belief networks, not isolated predictions
- Use \"narrative\" language: beliefs, assumptions, fragility, confidence decay
- Keep responses concise but insightful";

fn trend_word(trend: ConfidenceTrend) -> &'static str {
    match trend {
        ConfidenceTrend::Up => "rising",
        ConfidenceTrend::Down => "falling",
        ConfidenceTrend::Flat => "stable",
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

/// Assistant system prompt listing every narrative in the catalog
pub fn assistant_system_prompt<S: NarrativeStore + ?Sized>(store: &S) -> String {
    let mut prompt = String::from(ASSISTANT_INTRO);
    prompt.push_str("\n\nKey narratives you track:\n");

    for narrative in store.all_narratives() {
        let _ = writeln!(
            prompt,
            "- {} ({}% confidence, {})",
            narrative.name,
            narrative.confidence.score,
            trend_word(narrative.confidence.trend)
        );
    }

    prompt.push('\n');
    prompt.push_str(ASSISTANT_RULES);
    prompt
}

/// Context block describing a narrative for the explainers
pub fn narrative_context(narrative: &Narrative) -> String {
    let mut context = format!(
        "Narrative: {}\nSummary: {}\nConfidence: {}% ({})\n",
        narrative.name,
        narrative.summary,
        narrative.confidence.score,
        trend_word(narrative.confidence.trend)
    );

    if !narrative.assumptions.is_empty() {
        context.push_str("Key assumptions:\n");
        for assumption in &narrative.assumptions {
            let _ = writeln!(context, "- {} (fragility {}%)", assumption.text, assumption.fragility_score);
        }
    }
    context
}

/// Context block for a held position: every narrative driving the ticker
pub fn position_context<S: NarrativeStore + ?Sized>(store: &S, ticker: &str, weight: f64) -> String {
    let mut context = format!("Portfolio weight: {}%\n", percent(weight));

    let drivers = AssetDriver::for_ticker(store, ticker);
    if drivers.is_empty() {
        context.push_str("No tracked narrative names this asset.\n");
        return context;
    }

    context.push_str("Narrative exposures:\n");
    for driver in drivers {
        let _ = writeln!(
            context,
            "- {}: {}% ({}), narrative confidence {}%",
            driver.narrative.name,
            percent(driver.exposure_weight),
            driver.direction(),
            driver.narrative.confidence.score
        );
    }
    context
}

/// Context block for a graph node: the narrative plus its belief edges
pub fn node_context<S: NarrativeStore + ?Sized>(store: &S, narrative: &Narrative) -> String {
    let mut context = narrative_context(narrative);

    let edges: Vec<&BeliefEdge> = store
        .list_edges()
        .iter()
        .filter(|e| e.touches(&narrative.id))
        .collect();
    if !edges.is_empty() {
        context.push_str("Belief graph connections:\n");
        for edge in edges {
            let name_of = |id: &str| {
                store
                    .get_narrative(id)
                    .map(|n| n.name.clone())
                    .unwrap_or_else(|| format!("unknown narrative ({})", id))
            };
            let _ = writeln!(
                context,
                "- {} {} {} (strength {}%)",
                name_of(&edge.from_narrative_id),
                edge.relationship,
                name_of(&edge.to_narrative_id),
                percent(edge.strength)
            );
        }
    }
    context
}

/// A request for a one-off explanation
#[derive(Debug, Clone)]
pub enum ExplainRequest<'a> {
    /// Why an asset carries its weight on a narrative
    AssetExposure {
        /// The narrative
        narrative: &'a Narrative,
        /// The asset entry on that narrative
        asset: &'a AssetExposure,
    },

    /// What one piece of evidence means for a narrative
    Evidence {
        /// The narrative
        narrative: &'a Narrative,
        /// The evidence item
        evidence: &'a Evidence,
    },

    /// Which narratives a held position is betting on
    PortfolioPosition {
        /// Ticker
        ticker: &'a str,
        /// Display name
        name: &'a str,
        /// Free-form context, usually from [`position_context`]
        context: String,
    },

    /// A narrative seen as a node in the belief graph
    GraphNode {
        /// The narrative
        narrative: &'a Narrative,
        /// Free-form context, usually from [`node_context`]
        context: String,
    },

    /// The relationship carried by one belief edge
    GraphEdge {
        /// Source narrative
        from: &'a Narrative,
        /// The edge
        edge: &'a BeliefEdge,
        /// Target narrative
        to: &'a Narrative,
    },
}

impl ExplainRequest<'_> {
    /// Request kind as a stable identifier
    pub fn kind(&self) -> &'static str {
        match self {
            ExplainRequest::AssetExposure { .. } => "asset_exposure",
            ExplainRequest::Evidence { .. } => "evidence",
            ExplainRequest::PortfolioPosition { .. } => "portfolio_analysis",
            ExplainRequest::GraphNode { .. } => "belief_graph_node",
            ExplainRequest::GraphEdge { .. } => "belief_graph_edge",
        }
    }

    /// User prompt for this request
    pub fn prompt(&self) -> String {
        match self {
            ExplainRequest::AssetExposure { narrative, asset } => format!(
                "Explain why {} ({}) has a {}% exposure weight to the \"{}\" narrative.\n\n\
                 {}\n\
                 Provide a detailed 3-4 paragraph analysis covering:\n\
                 1. Why this asset is affected by this narrative\n\
                 2. The transmission mechanism (how the narrative impacts the asset's price)\n\
                 3. Key risks or nuances to this exposure",
                asset.ticker,
                asset.name,
                percent(asset.exposure_weight),
                narrative.name,
                narrative_context(narrative)
            ),
            ExplainRequest::Evidence { narrative, evidence } => format!(
                "Analyze this piece of evidence for the \"{}\" narrative:\n\n\
                 Source: {}\n\
                 Evidence: {}\n\n\
                 {}\n\
                 Provide a detailed 3-4 paragraph analysis covering:\n\
                 1. Why this evidence matters\n\
                 2. How it shifts confidence in the narrative\n\
                 3. What to watch for next",
                narrative.name,
                evidence.source,
                evidence.description,
                narrative_context(narrative)
            ),
            ExplainRequest::PortfolioPosition { ticker, name, context } => format!(
                "Analyze this portfolio position's narrative exposure:\n\n\
                 Ticker: {} ({})\n\
                 {}\n\
                 Explain which market narratives this position is most exposed to, \
                 whether the exposure is bullish or bearish, and what assumptions the holder \
                 is implicitly making by owning this position.",
                ticker, name, context
            ),
            ExplainRequest::GraphNode { narrative, context } => format!(
                "Explain the \"{}\" narrative in the context of a belief graph.\n\n\
                 {}\n\
                 Provide:\n\
                 1. A summary of why this narrative matters\n\
                 2. Its connections: which narratives it reinforces and which it conflicts with\n\
                 3. Its fragility points\n\
                 4. Investment implications",
                narrative.name, context
            ),
            ExplainRequest::GraphEdge { from, edge, to } => format!(
                "Explain the relationship between these two market narratives:\n\n\
                 \"{}\" {} \"{}\" (strength {}%)\n\n\
                 {}\n{}\n\
                 Explain:\n\
                 1. Why this relationship exists\n\
                 2. The causal mechanism\n\
                 3. Historical precedents\n\
                 4. What would change this relationship",
                from.name,
                edge.relationship,
                to.name,
                percent(edge.strength),
                narrative_context(from),
                narrative_context(to)
            ),
        }
    }

    /// Messages to send: the analyst system prompt followed by the request
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(ANALYST_SYSTEM_PROMPT),
            ChatMessage::user(self.prompt()),
        ]
    }
}
