use std::sync::Arc;

use crate::config::Config;
use crate::ingest::job_posting::JobPostingFetcher;
use crate::llm_client::CompletionClient;
use crate::rate_limit::IpRateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds shared handles only; the rate limiter's buckets are the one piece of
/// state that changes per request.
#[derive(Clone)]
pub struct AppState {
    /// Completion client used by both generation passes. `ApiClient` in production.
    pub llm: Arc<dyn CompletionClient>,
    pub fetcher: JobPostingFetcher,
    pub config: Config,
    /// Per-IP limit on the upload route; `None` when rate limiting is disabled.
    pub upload_limiter: Option<Arc<IpRateLimiter>>,
}
