//! Loader for pagesum settings with YAML + environment overlays.
//!
//! Precedence, lowest to highest: built-in defaults, YAML sources in the
//! order they were attached, then `PAGESUM__`-prefixed environment variables
//! (`PAGESUM__FETCH__TIMEOUT_SECS=5` sets `fetch.timeout_secs`). String values
//! may reference other environment variables as `${VAR}`; expansion runs after
//! merging and is applied recursively up to a fixed depth.
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use pagesum_common::observability::{LogConfig, LogFormat};
pub use pagesum_common::Limits;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Identifying header sent with every page fetch.
pub const DEFAULT_USER_AGENT: &str = "OpenDeepWikiBot/0.1 (+https://deepwiki.com)";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PagesumConfig {
    pub fetch: FetchSettings,
    pub limits: Limits,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: LogFormat,
    pub filter: String,
    pub emit_stderr: bool,
    pub emit_file: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "warn".into(),
            emit_stderr: true,
            emit_file: false,
            dir: None,
        }
    }
}

impl LoggingSettings {
    /// Translate into the initializer input used by `pagesum_common::observability`.
    pub fn to_log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            emit_file: self.emit_file,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

impl PagesumConfig {
    fn validate(&self) -> Result<(), LoadError> {
        if self.fetch.timeout_secs == 0 {
            return Err(LoadError::Invalid {
                key: "fetch.timeout_secs",
                reason: "must be at least 1 second".into(),
            });
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(LoadError::Invalid {
                key: "fetch.user_agent",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PagesumConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for PagesumConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PagesumConfigLoader {
    /// Start from defaults plus `PAGESUM__` env overrides.
    ///
    /// ```
    /// use pagesum_config::PagesumConfigLoader;
    ///
    /// let config = PagesumConfigLoader::new().load().expect("defaults are valid");
    ///
    /// assert_eq!(config.fetch.timeout_secs, 20);
    /// assert_eq!(config.limits.h1, 5);
    /// assert_eq!(config.limits.h2, 15);
    /// assert_eq!(config.limits.nav_links, 30);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use pagesum_config::PagesumConfigLoader;
    ///
    /// let cfg = PagesumConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// fetch:
    ///   timeout_secs: 5
    /// limits:
    ///   nav_links: 10
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.fetch.timeout_secs, 5);
    /// assert_eq!(cfg.limits.nav_links, 10);
    /// assert_eq!(cfg.limits.h1, 5);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// `${VAR}` placeholders are expanded before materialising the structs.
    ///
    /// ```
    /// use pagesum_config::PagesumConfigLoader;
    ///
    /// unsafe { std::env::set_var("CRAWLER_CONTACT", "ops@example.com"); }
    ///
    /// let config = PagesumConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// fetch:
    ///   user_agent: "pagesum/0.1 (${CRAWLER_CONTACT})"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.fetch.user_agent, "pagesum/0.1 (ops@example.com)");
    ///
    /// unsafe { std::env::remove_var("CRAWLER_CONTACT"); }
    /// ```
    pub fn load(self) -> Result<PagesumConfig, LoadError> {
        // Env is attached last so it overrides every file and snippet.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("PAGESUM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: PagesumConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}
