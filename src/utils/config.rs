use std::net::SocketAddr;
use std::time::Duration;

use crate::utils::error::ConfigError;

pub const DEFAULT_MODEL_ID: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_REWRITE_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone)]
pub struct RewriteConfig {
    pub enabled: bool,
    pub model_id: String,
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or("BIND_ADDR", lookup("BIND_ADDR"), || {
            DEFAULT_BIND_ADDR.parse().ok()
        })?;

        let enabled = match lookup("KBATTLE_USE_LLM") {
            Some(value) => parse_bool("KBATTLE_USE_LLM", &value)?,
            None => true,
        };

        let timeout_ms = parse_or("REWRITE_TIMEOUT_MS", lookup("REWRITE_TIMEOUT_MS"), || {
            Some(DEFAULT_REWRITE_TIMEOUT_MS)
        })?;

        let endpoint = lookup("REWRITE_ENDPOINT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            bind_addr,
            rewrite: RewriteConfig {
                enabled,
                model_id: lookup("KBATTLE_MODEL").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
                endpoint,
                timeout: Duration::from_millis(timeout_ms),
            },
        })
    }
}

fn parse_or<T, D>(key: &'static str, value: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    D: FnOnce() -> Option<T>,
{
    match value {
        Some(value) => {
            let parsed = value.trim().parse();
            parsed.map_err(|_| ConfigError::InvalidValue { key, value })
        }
        None => default().ok_or(ConfigError::InvalidValue {
            key,
            value: String::new(),
        }),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
