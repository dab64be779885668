//! Portfolio exposure and holdings import commands.

use super::Context;
use crate::cli::{ExposureArgs, ImportArgs};
use crate::error::Result;
use narrative_domain::list_exposures;
use narrative_ingest::import_portfolio;
use tracing::debug;

/// Execute the exposure command.
pub fn execute_exposure(args: ExposureArgs, ctx: &Context) -> Result<String> {
    let portfolio = ctx.portfolio(args.portfolio.as_deref())?;
    let exposures = list_exposures(&portfolio, &ctx.store);
    debug!(
        portfolio = %portfolio.name,
        material = exposures.len(),
        "Computed narrative exposures"
    );

    let top = args.top.unwrap_or(ctx.config.settings.top_exposures);
    ctx.formatter
        .exposures(&portfolio, &exposures, top, ctx.config.settings.concentration_k)
}

/// Execute the import command.
pub fn execute_import(args: ImportArgs, ctx: &Context) -> Result<String> {
    let portfolio = import_portfolio(&args.file, args.name.as_deref(), ctx.now, &ctx.config.import)?;
    ctx.formatter.holdings(&portfolio)
}
