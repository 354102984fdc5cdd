use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use remote_expander::api::decision_dto::ExpansionOptionDto;
use remote_expander::domain::expander::remote::remote_strategy::RemoteStrategy;
use remote_expander::domain::expander::strategy_trait::{Filter, Strategy};
use remote_expander::loader::parser::{load_decision, load_expander_config};
use remote_expander::{RandomStrategy, logger};

/// Runs a single expansion decision against a remote expander.
#[derive(Debug, Parser)]
#[command(name = "remote-expander", version)]
struct Cli {
    /// Remote expander configuration (JSON).
    #[arg(short, long)]
    config: PathBuf,

    /// Expansion options and node snapshots (JSON).
    #[arg(short, long)]
    input: PathBuf,

    /// Ask the remote expander to filter the options instead of picking one.
    #[arg(long)]
    filter: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    let config = load_expander_config(&cli.config).with_context(|| format!("loading {}", cli.config.display()))?;
    let decision = load_decision(&cli.input).with_context(|| format!("loading {}", cli.input.display()))?;
    let (options, node_infos) = decision.into_domain();
    log::info!("Loaded {} expansion options and {} node snapshots.", options.len(), node_infos.len());

    let strategy = RemoteStrategy::new(&config, Arc::new(RandomStrategy::new())).context("building remote expander")?;

    let output = if cli.filter {
        let kept: Vec<ExpansionOptionDto> = strategy.best_options(&options, &node_infos).into_iter().map(ExpansionOptionDto::from).collect();
        serde_json::to_string_pretty(&kept)?
    } else {
        let best = strategy.best_option(&options, &node_infos).map(ExpansionOptionDto::from);
        serde_json::to_string_pretty(&best)?
    };
    println!("{}", output);

    Ok(())
}
