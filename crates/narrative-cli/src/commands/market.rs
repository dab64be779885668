//! Belief graph, market overview and asset lens commands.

use super::Context;
use crate::error::Result;
use narrative_domain::{all_tags, AssetDriver, DashboardStats, MarketOverview};
use narrative_store::resolved_edges;

/// Execute the graph command.
pub fn execute_graph(ctx: &Context) -> Result<String> {
    ctx.formatter.edges(&resolved_edges(&ctx.store))
}

/// Execute the overview command.
pub fn execute_overview(ctx: &Context) -> Result<String> {
    let stats = DashboardStats::compute(&ctx.store, ctx.now);
    let overview = MarketOverview::build(&ctx.store);
    ctx.formatter.overview(&stats, &overview, &all_tags(&ctx.store))
}

/// Execute the asset command.
pub fn execute_asset(ticker: &str, ctx: &Context) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    let drivers = AssetDriver::for_ticker(&ctx.store, &ticker);
    ctx.formatter.asset(&ticker, &drivers)
}
