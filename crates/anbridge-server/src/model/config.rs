//! Configuration management for the anbridge server
//!
//! Settings are layered: `conf/application.yml`, then `ANBRIDGE_`-prefixed
//! environment variables, then command line overrides.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use config::{Config, Environment};
use tracing::warn;

use anbridge_common::{DEFAULT_REST_NAMESPACE, DEFAULT_SUBMISSION_TIMEOUT_SECS};

use super::form::{FormConfig, parse_form_id};
use crate::startup::{LogRotation, LoggingConfig};

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_SUBMISSION_LOG_FILE: &str = "logs/anbridge-log.txt";

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "anbridge-server", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
    /// Action Network API key
    #[arg(long = "api-key", env = "ANBRIDGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process command line
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> anyhow::Result<Self> {
        let config_file = args
            .config
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = Config::builder()
            .add_source(config::File::with_name(&config_file).required(false))
            .add_source(
                Environment::with_prefix("anbridge")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(port) = args.port {
            builder = builder
                .set_override("server.port", i64::from(port))
                .context("Failed to set server port override")?;
        }
        if let Some(api_key) = args.api_key {
            builder = builder
                .set_override("anbridge.api_key", api_key)
                .context("Failed to set API key override")?;
        }

        let config = builder
            .build()
            .with_context(|| format!("Failed to build configuration - check {}", config_file))?;

        Ok(Configuration { config })
    }

    /// Wrap an already built `Config`
    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|port| u16::try_from(port).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// REST namespace without surrounding slashes, e.g. `anbridge/v1`
    pub fn rest_namespace(&self) -> String {
        let namespace = self
            .config
            .get_string("anbridge.rest.namespace")
            .unwrap_or(DEFAULT_REST_NAMESPACE.to_string());
        let trimmed = namespace.trim().trim_matches('/');
        if trimmed.is_empty() {
            DEFAULT_REST_NAMESPACE.to_string()
        } else {
            trimmed.to_string()
        }
    }

    // ========================================================================
    // Submission Configuration
    // ========================================================================

    /// Global Action Network API key. Blank values count as absent.
    pub fn api_key(&self) -> Option<String> {
        self.config
            .get_string("anbridge.api_key")
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn submission_timeout(&self) -> Duration {
        let secs = self
            .config
            .get_int("anbridge.submission.timeout_secs")
            .ok()
            .and_then(|secs| u64::try_from(secs).ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SUBMISSION_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.config
            .get_int("anbridge.submission.connect_timeout_ms")
            .ok()
            .and_then(|ms| u64::try_from(ms).ok())
            .unwrap_or(5000)
    }

    /// Path of the user-facing submission log
    pub fn submission_log_file(&self) -> PathBuf {
        PathBuf::from(
            self.config
                .get_string("anbridge.log.file")
                .unwrap_or(DEFAULT_SUBMISSION_LOG_FILE.to_string()),
        )
    }

    /// Bearer token for the log viewer endpoints. Blank values count as absent.
    pub fn admin_token(&self) -> Option<String> {
        self.config
            .get_string("anbridge.admin.token")
            .ok()
            .filter(|token| !token.trim().is_empty())
    }

    // ========================================================================
    // Diagnostic Logging Configuration
    // ========================================================================

    /// Unknown `anbridge.logs.rotation` values fall back to daily rotation.
    pub fn logging_config(&self) -> LoggingConfig {
        let rotation = match self.config.get_string("anbridge.logs.rotation") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}, using daily rotation", e);
                LogRotation::Daily
            }),
            Err(_) => LogRotation::Daily,
        };

        LoggingConfig::from_config(
            self.config.get_string("anbridge.logs.dir").ok(),
            self.config.get_bool("anbridge.logs.console").unwrap_or(true),
            self.config.get_bool("anbridge.logs.file").unwrap_or(true),
            self.config
                .get_string("anbridge.logs.level")
                .unwrap_or("info".to_string()),
        )
        .with_rotation(rotation)
    }

    // ========================================================================
    // Forms
    // ========================================================================

    /// Forms configured under the `forms` table, keyed by form id.
    ///
    /// Entries whose key is not a positive integer are skipped.
    pub fn forms(&self) -> anyhow::Result<Vec<FormConfig>> {
        let table: HashMap<String, FormConfig> = match self.config.get("forms") {
            Ok(table) => table,
            Err(config::ConfigError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Invalid forms configuration"),
        };

        let mut forms: Vec<FormConfig> = table
            .into_iter()
            .filter_map(|(key, mut form)| {
                match parse_form_id(&serde_json::Value::String(key.clone())) {
                    Some(form_id) => {
                        form.form_id = form_id;
                        Some(form)
                    }
                    None => {
                        warn!(key = %key, "Skipping form with invalid id");
                        None
                    }
                }
            })
            .collect();
        forms.sort_by_key(|form| form.form_id);

        Ok(forms)
    }
}
