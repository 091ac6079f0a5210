// src/config.rs
//! Client configuration: defaults, optional config.yaml, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_API_URL: &str = "https://job-backend-1-9k6b.onrender.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub api: ApiConfig,
    pub query: QueryConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub directive: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<ConfigSection>,
    #[serde(default)]
    production: Option<ConfigSection>,
}

#[derive(Debug, Default, Clone, Deserialize)]
struct ConfigSection {
    api_url: Option<String>,
    timeout_seconds: Option<u64>,
    debounce_ms: Option<u64>,
    log_file: Option<PathBuf>,
    log_directive: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl QueryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            directive: DEFAULT_LOG_DIRECTIVE.to_string(),
        }
    }
}

impl ConfigManager {
    /// Load from `config.yaml` in the working directory (if present) and the
    /// process environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    pub fn load_from<F>(config_path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = env("JOB_BOARD_ENV")
            .or_else(|| env("ENVIRONMENT"))
            .unwrap_or_else(|| "local".to_string());
        info!("Loading configuration for environment: {}", environment);

        let section = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::section_for(&content, &environment)?
        } else {
            ConfigSection::default()
        };

        let mut config = Self {
            environment,
            api: ApiConfig::default(),
            query: QueryConfig::default(),
            log: LogConfig::default(),
        };
        config.apply_section(section);
        config.apply_env(env)?;

        Ok(config)
    }

    fn section_for(content: &str, environment: &str) -> Result<ConfigSection> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn apply_section(&mut self, section: ConfigSection) {
        if let Some(url) = section.api_url {
            self.api.base_url = url;
        }
        if let Some(timeout) = section.timeout_seconds {
            self.api.timeout_seconds = timeout;
        }
        if let Some(debounce) = section.debounce_ms {
            self.query.debounce_ms = debounce;
        }
        if section.log_file.is_some() {
            self.log.file = section.log_file;
        }
        if let Some(directive) = section.log_directive {
            self.log.directive = directive;
        }
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("JOB_BOARD_API_URL") {
            self.api.base_url = url;
        }
        if let Some(raw) = env("JOB_BOARD_TIMEOUT_SECS") {
            self.api.timeout_seconds = raw
                .parse()
                .with_context(|| format!("JOB_BOARD_TIMEOUT_SECS must be a number, got {}", raw))?;
        }
        if let Some(raw) = env("JOB_BOARD_DEBOUNCE_MS") {
            self.query.debounce_ms = raw
                .parse()
                .with_context(|| format!("JOB_BOARD_DEBOUNCE_MS must be a number, got {}", raw))?;
        }
        if let Some(path) = env("JOB_BOARD_LOG_FILE") {
            self.log.file = Some(PathBuf::from(path));
        }

        // Trailing slashes would double up against the absolute endpoint paths
        let trimmed = self.api.base_url.trim_end_matches('/').len();
        self.api.base_url.truncate(trimmed);
        Ok(())
    }
}
