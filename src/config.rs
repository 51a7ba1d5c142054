//! Configuration loaded from `franchise_lab.toml` and environment variables.
//!
//! The completion endpoint, bot/template id, and catalog path are fixed
//! configuration, not part of any component contract: any provider satisfying
//! "prompt in, text out, optionally streamed" can be substituted here.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

const CONFIG_FILE: &str = "franchise_lab.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Completion endpoint settings. The bearer key is runtime-only and never
/// serialized.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub api_url: String,
    pub bot_id: String,
    pub max_retries: u32,
    pub timeout_ms: u64,
    #[serde(skip)]
    pub api_key: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.protobots.ai/proto_bots/generate_v2".to_string(),
            bot_id: String::new(),
            max_retries: 3,
            timeout_ms: 20_000,
            api_key: String::new(),
        }
    }
}

/// Simulation-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub max_decisions: u32,
    pub catalog_path: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_decisions: 5,
            catalog_path: "data/heuristics.json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the optional toml file, then `FLAB_*`
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(raw) => toml::from_str(&raw).map_err(|e| LabError::Config {
                message: format!("invalid {CONFIG_FILE}: {e}"),
            })?,
            Err(_) => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FLAB_API_URL") {
            self.endpoint.api_url = url;
        }
        if let Ok(key) = std::env::var("FLAB_API_KEY") {
            self.endpoint.api_key = key;
        }
        if let Ok(bot_id) = std::env::var("FLAB_BOT_ID") {
            self.endpoint.bot_id = bot_id;
        }
        if let Some(retries) = std::env::var("FLAB_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0 && n <= 10)
        {
            self.endpoint.max_retries = retries;
        }
        if let Some(timeout) = std::env::var("FLAB_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.endpoint.timeout_ms = timeout;
        }
        if let Ok(path) = std::env::var("FLAB_CATALOG_PATH") {
            self.simulation.catalog_path = path;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint.max_retries, 3);
        assert_eq!(config.endpoint.timeout_ms, 20_000);
        assert_eq!(config.simulation.max_decisions, 5);
        assert!(config.endpoint.api_key.is_empty());
    }

    #[test]
    fn test_toml_round_trip_skips_api_key() {
        let mut config = Config::default();
        config.endpoint.api_key = "secret".to_string();
        let raw = toml::to_string(&config).unwrap();
        assert!(!raw.contains("secret"));

        let parsed: Config = toml::from_str(&raw).unwrap();
        assert!(parsed.endpoint.api_key.is_empty());
        assert_eq!(parsed.endpoint.max_retries, 3);
    }
}
