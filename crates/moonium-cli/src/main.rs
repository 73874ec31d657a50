/*
[INPUT]:  CLI arguments, optional config file, MOONIUM_* environment
[OUTPUT]: Admin session and project data printed to stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

mod cli;
mod commands;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use moonium_client::{AppConfig, FileStore, TracingNotifier};

use crate::cli::Cli;
use crate::commands::{store_path, App};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = AppConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(
        api_url = %config.api_url,
        environment = ?config.environment,
        "configuration loaded"
    );

    let path = store_path(&config)?;
    let store = FileStore::open(&path).with_context(|| format!("open {}", path.display()))?;
    info!(store = %path.display(), "session store opened");

    let app = App::new(config, Arc::new(store), Arc::new(TracingNotifier), args.json)?;
    let mut stdout = std::io::stdout().lock();
    app.run(args.command, &mut stdout).await
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
