use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cover_letter_api::config::Config;
use cover_letter_api::ingest::job_posting::JobPostingFetcher;
use cover_letter_api::llm_client::ApiClient;
use cover_letter_api::routes::build_router;
use cover_letter_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or invalid keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cover Letter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let policy = config.retry_policy();
    let llm = ApiClient::new(config.api_url.clone(), config.openrouter_api_key.clone(), policy)?;
    info!(
        "Completion client initialized (model: {}, attempts: {}, base delay: {:?})",
        config.model, policy.max_attempts, policy.base_delay
    );

    let fetcher = JobPostingFetcher::new()?;

    let state = AppState {
        llm: Arc::new(llm),
        fetcher,
        config: config.clone(),
        upload_limiter: config.upload_limiter().map(Arc::new),
    };
    match &state.upload_limiter {
        Some(_) => info!(
            "Upload rate limit: {} requests per minute per client IP",
            config.upload_rate_per_minute
        ),
        None => info!("Upload rate limiting disabled"),
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
