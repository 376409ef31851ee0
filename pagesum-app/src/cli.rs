use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use pagesum_common::PagesumError;
use pagesum_config::{PagesumConfig, PagesumConfigLoader};

/// Settings file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "pagesum.yaml";

#[derive(Debug, Parser)]
#[command(name = "pagesum", about = "Fetch and summarize a web page.")]
pub struct Cli {
    /// Target URL
    pub url: String,

    /// Timeout seconds (default: `fetch.timeout_secs`, 20)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Optional path to save raw HTML
    #[arg(long = "save-html", value_name = "PATH")]
    pub save_html: Option<PathBuf>,

    /// YAML settings file; `./pagesum.yaml` is used when present
    #[arg(long, env = "PAGESUM_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn load_config(&self) -> Result<PagesumConfig, PagesumError> {
        let loader = PagesumConfigLoader::new();
        let loader = match &self.config {
            Some(path) => loader.with_file(path),
            None => loader.with_optional_file(DEFAULT_CONFIG_FILE),
        };
        loader
            .load()
            .map_err(|e| PagesumError::Config(e.to_string()))
    }

    /// The flag wins over the configured value.
    pub fn timeout(&self, cfg: &PagesumConfig) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(cfg.fetch.timeout_secs))
    }
}
