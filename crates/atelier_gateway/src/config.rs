//! Environment-backed gateway configuration.

use atelier_error::{AtelierResult, ConfigError};
use std::time::Duration;
use tracing::{debug, instrument};

/// Provider API credentials.
///
/// Presence of a credential is what enrolls a provider in the registry;
/// there is no separate enable flag. Absent credentials simply leave that
/// provider out of every fallback chain.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Replicate API token (`REPLICATE_API_TOKEN`)
    pub replicate: Option<String>,
    /// PiAPI key (`PIAPI_API_KEY`)
    pub piapi: Option<String>,
    /// VModel API token (`VMODEL_API_TOKEN`)
    pub vmodel: Option<String>,
    /// HuggingFace token (`HUGGINGFACE_TOKEN`)
    pub huggingface: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Credentials {
    /// Read credentials from the environment, loading `.env` first.
    #[instrument]
    pub fn from_env() -> Self {
        // Missing .env is normal in deployed environments
        let _ = dotenvy::dotenv();
        let credentials = Self {
            replicate: env_opt("REPLICATE_API_TOKEN"),
            piapi: env_opt("PIAPI_API_KEY"),
            vmodel: env_opt("VMODEL_API_TOKEN"),
            huggingface: env_opt("HUGGINGFACE_TOKEN"),
        };
        debug!(
            replicate = credentials.replicate.is_some(),
            piapi = credentials.piapi.is_some(),
            vmodel = credentials.vmodel.is_some(),
            huggingface = credentials.huggingface.is_some(),
            "Loaded provider credentials"
        );
        credentials
    }

    /// Whether any provider credential is present.
    pub fn any(&self) -> bool {
        self.replicate.is_some()
            || self.piapi.is_some()
            || self.vmodel.is_some()
            || self.huggingface.is_some()
    }
}

/// Retry and budget policy for the gateway loop.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Retries per provider after the first attempt; each provider is
    /// tried `retry_count + 1` times before the chain advances
    pub retry_count: u32,
    /// Optional wall-clock budget for the whole request, spanning every
    /// provider and retry
    pub request_budget: Option<Duration>,
    /// Timeout for server-side result downloads
    pub download_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            retry_count: 2,
            request_budget: None,
            download_timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Read overrides from the environment on top of the defaults.
    ///
    /// `ATELIER_RETRY_COUNT` and `ATELIER_REQUEST_BUDGET_SECS` are
    /// recognized; anything unset keeps its default.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a variable is present but not a
    /// valid number.
    #[instrument]
    pub fn from_env() -> AtelierResult<Self> {
        let mut config = Self::default();
        if let Some(raw) = env_opt("ATELIER_RETRY_COUNT") {
            config.retry_count = raw.parse().map_err(|_| {
                ConfigError::new("ATELIER_RETRY_COUNT", format!("not a number: `{raw}`"))
            })?;
        }
        if let Some(raw) = env_opt("ATELIER_REQUEST_BUDGET_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ConfigError::new("ATELIER_REQUEST_BUDGET_SECS", format!("not a number: `{raw}`"))
            })?;
            config.request_budget = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = GatewayConfig::default();
        assert_eq!(config.retry_count, 2);
        assert!(config.request_budget.is_none());
    }

    #[test]
    fn empty_credentials_register_nothing() {
        let credentials = Credentials::default();
        assert!(!credentials.any());
    }
}
