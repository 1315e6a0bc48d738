//! Runtime configuration read from the environment (and `.env`, when present).

use crate::framework::WritePolicy;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const API_URL_VAR: &str = "RESTAURANT_API_URL";
pub const CREDENTIAL_PATH_VAR: &str = "RESTAURANT_CREDENTIAL_PATH";
pub const WRITE_POLICY_VAR: &str = "RESTAURANT_WRITE_POLICY";
pub const CHANNEL_CAPACITY_VAR: &str = "RESTAURANT_CHANNEL_CAPACITY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub credential_path: PathBuf,
    pub write_policy: WritePolicy,
    /// Capacity of every actor request channel.
    pub channel_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            credential_path: PathBuf::from(".restaurant-token"),
            write_policy: WritePolicy::default(),
            channel_capacity: 32,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|var| env::var(var).ok())?;
        tracing::info!(
            api_url = %config.api_url,
            write_policy = ?config.write_policy,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Builds the configuration from any variable source. Unset or blank variables
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let write_policy = match get(WRITE_POLICY_VAR) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: WRITE_POLICY_VAR,
                reason,
            })?,
            None => defaults.write_policy,
        };

        let channel_capacity = match get(CHANNEL_CAPACITY_VAR) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        var: CHANNEL_CAPACITY_VAR,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: CHANNEL_CAPACITY_VAR,
                        reason: e.to_string(),
                    })
                }
            },
            None => defaults.channel_capacity,
        };

        Ok(Self {
            api_url: get(API_URL_VAR).unwrap_or(defaults.api_url),
            credential_path: get(CREDENTIAL_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.credential_path),
            write_policy,
            channel_capacity,
        })
    }
}
