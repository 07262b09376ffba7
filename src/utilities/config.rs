use std::path::PathBuf;
use std::time::Duration;
use std::{env, fmt};

use url::Url;

use crate::hooks::SettlePolicy;

const DEFAULT_API_BASE_URL: &str = "https://api.mythiq.ai";
const DEFAULT_API_KEY: &str = "demo-key";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub api_key: String,
    pub user_agent: Option<String>,
    pub timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub settle_policy: SettlePolicy,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBaseUrl(String),
    InvalidTimeout(String),
    InvalidSettlePolicy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(reason) => write!(f, "invalid MYTHIQ_API_BASE_URL: {reason}"),
            Self::InvalidTimeout(value) => {
                write!(f, "invalid MYTHIQ_TIMEOUT_SECS {value:?}: expected a positive integer")
            }
            Self::InvalidSettlePolicy(reason) => write!(f, "invalid MYTHIQ_SETTLE_POLICY: {reason}"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
        };

        let api_base_url =
            var("MYTHIQ_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let api_base_url =
            Url::parse(&api_base_url).map_err(|err| ConfigError::InvalidBaseUrl(err.to_string()))?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "unsupported scheme {:?}",
                api_base_url.scheme()
            )));
        }

        let timeout = match var("MYTHIQ_TIMEOUT_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(value)),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let settle_policy = var("MYTHIQ_SETTLE_POLICY")
            .map(|value| value.parse::<SettlePolicy>())
            .transpose()
            .map_err(ConfigError::InvalidSettlePolicy)?
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            api_key: var("MYTHIQ_API_KEY").unwrap_or_else(|| DEFAULT_API_KEY.into()),
            user_agent: var("USER_AGENT"),
            timeout,
            log_file: var("MYTHIQ_LOG_FILE").map(PathBuf::from),
            settle_policy,
        })
    }
}
