use anyhow::{Result, anyhow};
use callback_core::SharedSecret;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_secret_key: SharedSecret,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            api_secret_key: SharedSecret::new(required_var(&lookup, "API_SECRET_KEY")?),
            log_format: log_format_var(&lookup, "CALLBACK_LOG_FORMAT")?,
        };

        Ok(config)
    }
}

fn required_var<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name).ok_or_else(|| anyhow!("missing required env var: {name}"))?;
    if value.trim().is_empty() {
        return Err(anyhow!("required env var {name} cannot be empty"));
    }
    Ok(value)
}

fn log_format_var<F>(lookup: &F, name: &str) -> Result<LogFormat>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name)
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .as_deref()
    {
        None | Some("text") => Ok(LogFormat::Text),
        Some("json") => Ok(LogFormat::Json),
        Some(other) => Err(anyhow!("invalid {name}: {other} (expected text or json)")),
    }
}
