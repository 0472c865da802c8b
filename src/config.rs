use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use log::{info, error};
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "harvest_config.json";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Everything a harvest run needs, passed explicitly into the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub keywords: Vec<String>,
    /// Number of successful records to collect.
    pub target_count: usize,
    /// Courtesy sleep before every page fetch.
    pub fetch_delay_secs: u64,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Backfill asks for `remaining * backfill_multiplier` URLs.
    pub backfill_multiplier: usize,
    /// Optional cap on backfill calls; reaching it ends the run early.
    /// Unset means backfilling continues until it finds nothing new.
    pub max_backfill_rounds: Option<usize>,
    pub log_level: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        HarvestConfig {
            keywords: vec![
                "Software Reliability Growth".to_string(),
                "Software Reliability Growth Models".to_string(),
                "SRGM".to_string(),
            ],
            // DuckDuckGo's HTML endpoint tops out around 30 results per query
            target_count: 30,
            fetch_delay_secs: 1,
            output_path: PathBuf::from("scraped_data.json"),
            request_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            backfill_multiplier: 2,
            max_backfill_rounds: None,
            log_level: "info".to_string(),
        }
    }
}

impl HarvestConfig {
    /// Reads the config file at `path`, falling back to defaults when it is
    /// missing or unusable.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {:?}. Using defaults.", path);
            return HarvestConfig::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                HarvestConfig::default()
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("at least one keyword is required".to_string()));
        }
        if self.backfill_multiplier == 0 {
            return Err(ConfigError::Invalid("backfill_multiplier must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_secs(self.fetch_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
