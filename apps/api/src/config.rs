use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::backoff::RetryPolicy;
use crate::rate_limit::IpRateLimiter;

const DEFAULT_MODEL: &str = "openai/gpt-oss-20b:free";
const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const MIN_API_KEY_LEN: usize = 10;
const DEFAULT_UPLOAD_RATE_PER_MINUTE: u32 = 10;

/// Application configuration loaded from environment variables.
/// Startup fails if the secret key or API key is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Signing key shared with the session layer in front of this service.
    pub secret_key: String,
    pub openrouter_api_key: String,
    pub model: String,
    pub api_url: String,
    pub max_upload_bytes: usize,
    pub api_max_retries: u32,
    pub api_base_delay: Duration,
    pub rate_limit_enabled: bool,
    /// Uploads allowed per client IP per minute.
    pub upload_rate_per_minute: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            secret_key: optional_env("SECRET_KEY").unwrap_or_default(),
            openrouter_api_key: optional_env("OPENROUTER_API_KEY").unwrap_or_default(),
            model: optional_env("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: optional_env("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            api_max_retries: parse_env("API_MAX_RETRIES", RetryPolicy::default().max_attempts)?,
            api_base_delay: Duration::from_secs(parse_env(
                "API_BASE_DELAY_SECS",
                RetryPolicy::default().base_delay.as_secs(),
            )?),
            rate_limit_enabled: parse_env("RATE_LIMIT_ENABLED", true)?,
            upload_rate_per_minute: parse_env(
                "RATE_LIMIT_UPLOADS_PER_MINUTE",
                DEFAULT_UPLOAD_RATE_PER_MINUTE,
            )?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the settings without which no request can succeed.
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            bail!("SECRET_KEY is not configured");
        }
        if self.openrouter_api_key.is_empty() {
            bail!("OPENROUTER_API_KEY is not configured");
        }
        if self.openrouter_api_key.len() < MIN_API_KEY_LEN {
            bail!("Invalid OPENROUTER_API_KEY: expected at least {MIN_API_KEY_LEN} characters");
        }
        if self.rate_limit_enabled && self.upload_rate_per_minute == 0 {
            bail!("RATE_LIMIT_UPLOADS_PER_MINUTE must be at least 1 when rate limiting is enabled");
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.api_max_retries, self.api_base_delay)
    }

    /// Limiter for the upload route, or `None` when rate limiting is off.
    pub fn upload_limiter(&self) -> Option<IpRateLimiter> {
        NonZeroU32::new(self.upload_rate_per_minute)
            .filter(|_| self.rate_limit_enabled)
            .map(IpRateLimiter::per_minute)
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        secret_key: "test-secret".to_string(),
        openrouter_api_key: "sk-or-test-1234567890".to_string(),
        model: DEFAULT_MODEL.to_string(),
        api_url: DEFAULT_API_URL.to_string(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        api_max_retries: 3,
        api_base_delay: Duration::from_secs(1),
        rate_limit_enabled: true,
        upload_rate_per_minute: DEFAULT_UPLOAD_RATE_PER_MINUTE,
        port: 8080,
        rust_log: "info".to_string(),
    }
}
