//! Runtime configuration.
//!
//! Defaults cover everything. A TOML file named by `ORDER_BOT_CONFIG` replaces any
//! of them, and `ORDER_BOT_OFFER_DROPOFF` / `ORDER_BOT_LISTING_LIMIT` override the
//! file.
//!
//! ```toml
//! orders_listing_limit = 10
//! offer_dropoff = true
//!
//! [[catalog]]
//! name = "Wash & Fold"
//! price = "150.00"
//! ```

use crate::conversation::WorkflowSettings;
use crate::model::{default_entries, CatalogEntry, CatalogError, PricingCatalog};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "ORDER_BOT_CONFIG";
pub const OFFER_DROPOFF_VAR: &str = "ORDER_BOT_OFFER_DROPOFF";
pub const LISTING_LIMIT_VAR: &str = "ORDER_BOT_LISTING_LIMIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Request buffer of the order actor's channel.
    pub channel_buffer: usize,
    pub orders_listing_limit: usize,
    pub offer_dropoff: bool,
    pub currency_symbol: String,
    pub catalog: Vec<CatalogEntry>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            orders_listing_limit: 20,
            offer_dropoff: false,
            currency_symbol: "#".to_string(),
            catalog: default_entries(),
        }
    }
}

impl BotConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(value) = lookup(OFFER_DROPOFF_VAR) {
            config.offer_dropoff = parse_flag(&value).ok_or(ConfigError::InvalidEnv {
                var: OFFER_DROPOFF_VAR,
                value,
            })?;
        }
        if let Some(value) = lookup(LISTING_LIMIT_VAR) {
            config.orders_listing_limit = match value.trim().parse() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: LISTING_LIMIT_VAR,
                        value,
                    })
                }
            };
        }
        Ok(config)
    }

    pub fn pricing_catalog(&self) -> Result<PricingCatalog, ConfigError> {
        Ok(PricingCatalog::new(self.catalog.clone())?)
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            listing_limit: self.orders_listing_limit,
            offer_dropoff: self.offer_dropoff,
            currency_symbol: self.currency_symbol.clone(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
