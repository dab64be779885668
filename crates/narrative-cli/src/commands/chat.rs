//! Assistant chat and analyst explanation commands.

use super::Context;
use crate::cli::ExplainTarget;
use crate::error::{CliError, Result};
use crate::repl;
use futures::StreamExt;
use narrative_domain::NarrativeStore;
use narrative_llm::prompt::{node_context, position_context};
use narrative_llm::{assistant_system_prompt, ChatProvider, ChatSession, ExplainRequest};
use std::io::{self, Write};

/// Print a streamed fragment as soon as it arrives.
pub fn print_fragment(fragment: &str) {
    print!("{}", fragment);
    let _ = io::stdout().flush();
}

/// Execute the chat command.
///
/// With a message, streams one answer; without, starts the interactive session.
pub async fn execute_chat<P: ChatProvider>(message: Option<String>, ctx: &Context, provider: P) -> Result<()> {
    let mut session = ChatSession::new(provider, assistant_system_prompt(&ctx.store));

    match message {
        Some(message) => {
            let reply = session.send(&message, print_fragment).await;
            println!();
            reply?;
        }
        None => repl::run_chat(&mut session, ctx).await?,
    }
    Ok(())
}

/// Execute the explain command, passing fragments to `sink`.
///
/// Returns the assembled explanation.
pub async fn execute_explain<P, F>(target: ExplainTarget, ctx: &Context, provider: &P, mut sink: F) -> Result<String>
where
    P: ChatProvider,
    F: FnMut(&str),
{
    let portfolio;
    let request = match &target {
        ExplainTarget::Node { id } => {
            let narrative = ctx.narrative(id)?;
            ExplainRequest::GraphNode {
                narrative,
                context: node_context(&ctx.store, narrative),
            }
        }
        ExplainTarget::Edge { id } => {
            let edge = ctx
                .store
                .list_edges()
                .iter()
                .find(|e| e.id == *id)
                .ok_or_else(|| CliError::not_found("Edge", id.as_str()))?;
            ExplainRequest::GraphEdge {
                from: ctx.narrative(&edge.from_narrative_id)?,
                edge,
                to: ctx.narrative(&edge.to_narrative_id)?,
            }
        }
        ExplainTarget::Asset { id, ticker } => {
            let narrative = ctx.narrative(id)?;
            let asset = narrative
                .affected_assets
                .iter()
                .find(|a| a.ticker.eq_ignore_ascii_case(ticker))
                .ok_or_else(|| CliError::not_found("Asset", format!("{} on {}", ticker, id)))?;
            ExplainRequest::AssetExposure { narrative, asset }
        }
        ExplainTarget::Evidence { id, evidence } => {
            let narrative = ctx.narrative(id)?;
            let evidence = narrative
                .supporting_evidence
                .iter()
                .chain(&narrative.contradicting_evidence)
                .find(|e| e.id == *evidence)
                .ok_or_else(|| CliError::not_found("Evidence", format!("{} on {}", evidence, id)))?;
            ExplainRequest::Evidence { narrative, evidence }
        }
        ExplainTarget::Position { ticker, portfolio: path } => {
            portfolio = ctx.portfolio(path.as_deref())?;
            let holding = portfolio
                .holdings
                .iter()
                .find(|h| h.ticker.eq_ignore_ascii_case(ticker))
                .ok_or_else(|| CliError::not_found("Position", ticker.as_str()))?;
            ExplainRequest::PortfolioPosition {
                ticker: &holding.ticker,
                name: &holding.name,
                context: position_context(&ctx.store, &holding.ticker, holding.weight),
            }
        }
    };

    tracing::debug!(kind = request.kind(), "Requesting explanation");
    let mut stream = provider.stream_chat(&request.messages()).await?;

    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        sink(&fragment);
        text.push_str(&fragment);
    }
    Ok(text)
}
