//! Narrative Lens - market narrative tracking from the command line.

use chrono::Utc;
use clap::Parser;
use narrative_cli::commands::{self, chat::print_fragment};
use narrative_cli::{Cli, Command, Config, Context, Formatter};
use narrative_llm::GatewayClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> narrative_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let ctx = Context::load(config, formatter, cli.catalog, Utc::now())?;
    tracing::debug!(narratives = ctx.store.len(), "Catalog loaded");

    let output = match cli.command {
        Command::List(args) => commands::execute_list(args, &ctx)?,
        Command::Show { id } => commands::execute_show(&id, &ctx)?,
        Command::Decay => commands::execute_decay(&ctx)?,
        Command::Exposure(args) => commands::execute_exposure(args, &ctx)?,
        Command::Import(args) => commands::execute_import(args, &ctx)?,
        Command::Graph => commands::execute_graph(&ctx)?,
        Command::Overview => commands::execute_overview(&ctx)?,
        Command::Asset { ticker } => commands::execute_asset(&ticker, &ctx)?,
        Command::Init { force } => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::path()?,
            };
            commands::execute_init(&path, force, &ctx)?
        }
        Command::Chat { message } => {
            let client = GatewayClient::from_config(&ctx.config.gateway)?;
            commands::execute_chat(message, &ctx, client).await?;
            return Ok(());
        }
        Command::Explain { target } => {
            let client = GatewayClient::from_config(&ctx.config.gateway)?;
            commands::execute_explain(target, &ctx, &client, print_fragment).await?;
            println!();
            return Ok(());
        }
    };

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
