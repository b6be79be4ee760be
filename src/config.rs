//! Swap Configuration
//!
//! Endpoints, timings and optional preconfigured wallet addresses. Values come
//! from, in increasing priority: built-in defaults, environment variables, a
//! TOML file, and finally command line flags (applied by the binary).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::handoff::DEFAULT_PROGRESS_PATH;

const CONFIG_DIR_NAME: &str = ".swap-typeform";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
    /// Base URL of the quote proxy
    pub quote_api_base: String,
    /// Path of the quote endpoint on `quote_api_base`
    pub quote_path: String,
    pub request_timeout_secs: u64,
    /// 0 sends one request per amount edit
    pub quote_debounce_ms: u64,
    pub milestone_interval_ms: u64,
    /// Where the handoff navigates to
    pub progress_path: String,
    /// Ethereum address to offer on the connect step
    pub eth_address: Option<String>,
    /// Stellar address to offer on the connect step
    pub stellar_address: Option<String>,
}

impl Default for SwapConfig {
    fn default() -> Self {
        let defaults = Self::defaults();
        Self {
            quote_api_base: std::env::var("SWAP_QUOTE_API_BASE")
                .unwrap_or(defaults.quote_api_base),
            quote_path: std::env::var("SWAP_QUOTE_PATH").unwrap_or(defaults.quote_path),
            request_timeout_secs: env_u64("SWAP_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            quote_debounce_ms: env_u64("SWAP_QUOTE_DEBOUNCE_MS")
                .unwrap_or(defaults.quote_debounce_ms),
            milestone_interval_ms: env_u64("SWAP_MILESTONE_INTERVAL_MS")
                .unwrap_or(defaults.milestone_interval_ms),
            progress_path: defaults.progress_path,
            eth_address: std::env::var("SWAP_ETH_ADDRESS").ok(),
            stellar_address: std::env::var("SWAP_STELLAR_ADDRESS").ok(),
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl SwapConfig {
    /// Built-in values, ignoring the environment
    pub fn defaults() -> Self {
        Self {
            quote_api_base: "http://localhost:3000".to_string(),
            quote_path: "/api/1inch/quote".to_string(),
            request_timeout_secs: 30,
            quote_debounce_ms: 0,
            milestone_interval_ms: 1500,
            progress_path: DEFAULT_PROGRESS_PATH.to_string(),
            eth_address: None,
            stellar_address: None,
        }
    }

    /// Load from a TOML file; keys missing from the file keep their
    /// environment/default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: SwapConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        debug!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else the default location if it exists, else
    /// fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn quote_url(&self) -> String {
        format!(
            "{}/{}",
            self.quote_api_base.trim_end_matches('/'),
            self.quote_path.trim_start_matches('/')
        )
    }

    pub fn quote_debounce(&self) -> Duration {
        Duration::from_millis(self.quote_debounce_ms)
    }

    pub fn milestone_interval(&self) -> Duration {
        Duration::from_millis(self.milestone_interval_ms)
    }
}

/// `~/.swap-typeform/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
