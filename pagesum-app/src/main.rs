use anyhow::{Context, Result};
use clap::Parser;
use pagesum_common::observability::init_logging;

mod cli;
mod run;

use cli::Cli;

// One fetch, no fan-out: a single-threaded runtime is all the binary needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = cli.load_config()?;

    init_logging(cfg.logging.to_log_config("pagesum"))?;

    let summary = run::run(&cli, &cfg).await?;
    let json = summary
        .to_json_pretty()
        .context("failed to serialize page summary")?;
    println!("{json}");

    tracing::info!(
        url = %cli.url,
        h1 = summary.h1.len(),
        h2 = summary.h2.len(),
        nav_links = summary.nav_links.len(),
        "app.summary.written"
    );
    Ok(())
}
