//! Narrative listing, detail and decay commands.

use super::Context;
use crate::cli::ListArgs;
use crate::error::Result;
use narrative_domain::{NarrativeFilter, NarrativeStore, RelationKind};
use narrative_store::related;

/// Execute the list command.
pub fn execute_list(args: ListArgs, ctx: &Context) -> Result<String> {
    let filter = NarrativeFilter {
        text: args.search,
        tag: args.tag,
    };
    let narratives = ctx.store.list_narratives(&filter);
    ctx.formatter.narratives(&narratives, ctx.now)
}

/// Execute the show command.
pub fn execute_show(id: &str, ctx: &Context) -> Result<String> {
    let narrative = ctx.narrative(id)?;
    let related: Vec<_> = RelationKind::ALL
        .iter()
        .map(|&kind| (kind, related(&ctx.store, narrative, kind)))
        .collect();

    ctx.formatter.narrative_detail(narrative, &related, ctx.now)
}

/// Execute the decay command.
pub fn execute_decay(ctx: &Context) -> Result<String> {
    ctx.formatter.decay(&ctx.store.all_narratives(), ctx.now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::config::OutputFormat;
    use crate::error::CliError;

    #[test]
    fn test_list_filters_by_tag() {
        let ctx = fixtures::context_with(OutputFormat::Quiet);
        let output = execute_list(
            ListArgs {
                search: None,
                tag: Some("AI".into()),
            },
            &ctx,
        )
        .unwrap();

        assert!(output.lines().any(|l| l == "ai-capex-supercycle"));
        assert!(!output.lines().any(|l| l == "fed-rate-cuts"));
    }

    #[test]
    fn test_list_search_without_match() {
        let ctx = fixtures::context();
        let output = execute_list(
            ListArgs {
                search: Some("no such narrative".into()),
                tag: None,
            },
            &ctx,
        )
        .unwrap();
        assert!(output.contains("No narratives found"));
    }

    #[test]
    fn test_show_unknown_id() {
        let ctx = fixtures::context();
        let result = execute_show("missing", &ctx);
        assert!(matches!(result, Err(CliError::NotFound { kind: "Narrative", .. })));
    }

    #[test]
    fn test_show_includes_related() {
        let ctx = fixtures::context();
        let output = execute_show("ai-capex-supercycle", &ctx).unwrap();
        assert!(output.contains("Related narratives"));
        assert!(output.contains("semiconductor-shortage (unknown)"));
        assert!(output.contains("History"));
    }

    #[test]
    fn test_decay_lists_every_narrative() {
        let ctx = fixtures::context();
        let output = execute_decay(&ctx).unwrap();
        for narrative in ctx.store.all_narratives() {
            assert!(output.contains(&narrative.id));
        }
    }
}
