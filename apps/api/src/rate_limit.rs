//! Per-client request limits for the upload endpoint.
//!
//! Clients are keyed by peer IP. Requests arriving without connection info
//! (in-process callers, tests) share the loopback bucket.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

const FALLBACK_CLIENT_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Token bucket per client IP. A full bucket allows `requests` back to back,
/// then one more every `60s / requests`.
pub struct IpRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl IpRateLimiter {
    pub fn per_minute(requests: NonZeroU32) -> Self {
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(requests)),
        }
    }

    /// Takes one request from `ip`'s bucket. `false` once the bucket is empty.
    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(FALLBACK_CLIENT_IP)
}

/// Rejects the request with 429 when its client has used up its quota.
pub async fn limit_uploads(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(limiter) = &state.upload_limiter {
        let ip = client_ip(&request);
        if !limiter.check(ip) {
            warn!("Upload rate limit exceeded for {ip}");
            return Err(AppError::RateLimited(
                "Too many requests. Please wait a minute before trying again.".to_string(),
            ));
        }
    }
    Ok(next.run(request).await)
}
