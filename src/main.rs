//! Entry point for the Fleet Payout binary.
//!
//! Running this binary settles every report in a JSON input document
//! and writes the summaries together with the recalculated reports back
//! out as JSON. Paths come from the `FLEET_PAYOUT_INPUT`,
//! `FLEET_PAYOUT_POLICY` and `FLEET_PAYOUT_OUTPUT` environment
//! variables; log verbosity from `RUST_LOG`.

use anyhow::{Context, Result};
use fleet_payout::config::Config;
use fleet_payout::engine::{self, SettlementInput};
use fleet_payout::policy::load_policy;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &Config) -> Result<()> {
    let data = std::fs::read_to_string(&config.input)
        .with_context(|| format!("failed to read input {}", config.input.display()))?;
    let input: SettlementInput = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse input {}", config.input.display()))?;

    let policy = config.policy.as_deref().map(load_policy).transpose()?;
    if let Some(policy) = &policy {
        info!(policy = %policy.name, cut = policy.corporation_cut, "using payout policy override");
    }

    let settled = engine::run(input, policy.as_ref());
    let output = serde_json::to_string_pretty(&settled)?;
    match &config.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write output {}", path.display()))?,
        None => println!("{output}"),
    }
    Ok(())
}

fn main() {
    setup_logging();
    let config = Config::from_env();
    if let Err(err) = run(&config) {
        error!("settlement failed: {err:#}");
        std::process::exit(1);
    }
}
