//! Process configuration read from `POS_*` environment variables.

use core::str::FromStr;

use anyhow::Context;
use thiserror::Error;

use ticketpos_core::BusinessId;
use ticketpos_observability::LogFormat;
use ticketpos_products::LOW_STOCK_THRESHOLD;

pub const BUSINESS_ID_VAR: &str = "POS_BUSINESS_ID";
pub const CURRENCY_SYMBOL_VAR: &str = "POS_CURRENCY_SYMBOL";
pub const LOW_STOCK_THRESHOLD_VAR: &str = "POS_LOW_STOCK_THRESHOLD";
pub const LOG_FORMAT_VAR: &str = "POS_LOG_FORMAT";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosConfig {
    pub business_id: BusinessId,
    pub currency_symbol: String,
    pub low_stock_threshold: u32,
    pub log_format: LogFormat,
}

impl PosConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests, embedded hosts).
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let raw_business_id = get(BUSINESS_ID_VAR).ok_or(ConfigError::Missing(BUSINESS_ID_VAR))?;
        let business_id = BusinessId::from_str(raw_business_id.trim()).map_err(|e| {
            ConfigError::Invalid {
                var: BUSINESS_ID_VAR,
                value: raw_business_id.clone(),
                reason: e.to_string(),
            }
        })?;

        let currency_symbol = match get(CURRENCY_SYMBOL_VAR) {
            Some(symbol) => symbol.trim().to_string(),
            None => {
                tracing::warn!("{CURRENCY_SYMBOL_VAR} not set; using {DEFAULT_CURRENCY_SYMBOL:?}");
                DEFAULT_CURRENCY_SYMBOL.to_string()
            }
        };

        let low_stock_threshold = match get(LOW_STOCK_THRESHOLD_VAR) {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                var: LOW_STOCK_THRESHOLD_VAR,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => {
                tracing::warn!("{LOW_STOCK_THRESHOLD_VAR} not set; using {LOW_STOCK_THRESHOLD}");
                LOW_STOCK_THRESHOLD
            }
        };

        let log_format = match get(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|reason| ConfigError::Invalid {
                var: LOG_FORMAT_VAR,
                value: raw.clone(),
                reason,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            business_id,
            currency_symbol,
            low_stock_threshold,
            log_format,
        })
    }

    /// Read the environment and install logging in the configured format.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::from_env().context("failed to load POS configuration")?;
        ticketpos_observability::init_with(config.log_format);
        tracing::info!(
            business_id = %config.business_id,
            currency = %config.currency_symbol,
            low_stock_threshold = config.low_stock_threshold,
            "configuration loaded"
        );
        Ok(config)
    }
}
