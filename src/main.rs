use anyhow::{Context, Result};
use clap::Parser;
use rollover_replay::{logging, replay, Cli, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init_tracing();

    let config = Config::from_cli(Cli::parse()).context("Invalid configuration")?;
    replay::run_from_config(&config)
        .await
        .with_context(|| format!("Rollover replay of {} aborted", config.log_path.display()))?;

    Ok(())
}
