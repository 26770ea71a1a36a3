//! LLM Client: the single point of entry for chat completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! All generation passes go through `CompletionClient`, which `ApiClient`
//! implements with exponential backoff on rate limits and transient failures.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

pub mod backoff;
pub mod types;

use backoff::{RetryPolicy, Sleeper, TokioSleeper};
use types::ChatRequest;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Rate limit exceeded. Please try again in a few minutes.")]
    RateLimited,

    #[error("API request failed after {attempts} attempts: {message}")]
    RequestFailed { attempts: u32, message: String },

    #[error("Maximum retry attempts exceeded")]
    RetriesExhausted,
}

/// Anything that can turn a chat request into a raw JSON response body.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<serde_json::Value, ApiError>;
}

/// Outcome of a single HTTP attempt, before the retry decision.
enum Attempt {
    Success(serde_json::Value),
    RateLimited,
    Failed(String),
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    api_key: String,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ApiClient {
    /// No request timeout is set: generation calls may take as long as the provider needs.
    pub fn new(api_url: String, api_key: String, policy: RetryPolicy) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            api_url,
            api_key,
            policy,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replaces the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    async fn attempt(&self, request: &ChatRequest) -> Attempt {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return Attempt::Failed(e.to_string()),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Attempt::RateLimited;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Attempt::Failed(format!("HTTP {status}: {body}"));
        }

        match response.json::<serde_json::Value>().await {
            Ok(body) => Attempt::Success(body),
            Err(e) => Attempt::Failed(format!("invalid response body: {e}")),
        }
    }
}

#[async_trait]
impl CompletionClient for ApiClient {
    /// Sends `request`, retrying 429s and transient failures.
    ///
    /// Attempt `n` (0-indexed) that fails with attempts remaining is followed by
    /// a sleep of `base_delay * 2^n`. The final attempt never sleeps.
    async fn send(&self, request: &ChatRequest) -> Result<serde_json::Value, ApiError> {
        let max_attempts = self.policy.max_attempts;

        for attempt in 0..max_attempts {
            match self.attempt(request).await {
                Attempt::Success(body) => {
                    debug!("Completion call succeeded on attempt {}", attempt + 1);
                    return Ok(body);
                }
                Attempt::RateLimited => {
                    if !self.policy.has_attempts_after(attempt) {
                        return Err(ApiError::RateLimited);
                    }
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "Rate limited. Waiting {}ms before retry {}/{}",
                        delay.as_millis(),
                        attempt + 1,
                        max_attempts
                    );
                    self.sleeper.sleep(delay).await;
                }
                Attempt::Failed(message) => {
                    if !self.policy.has_attempts_after(attempt) {
                        return Err(ApiError::RequestFailed {
                            attempts: max_attempts,
                            message,
                        });
                    }
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "API request failed: {message}. Retrying in {}ms",
                        delay.as_millis()
                    );
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        Err(ApiError::RetriesExhausted)
    }
}
