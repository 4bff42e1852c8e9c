// src/middleware/rate_limit.rs

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

use crate::{common::error::AppError, config::AppState};

pub const DEFAULT_MAX_REQUESTS: u32 = 100;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Limite de requisições por IP: `max_requests` por janela, repostas aos poucos.
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RequestThrottle {
    pub fn new(max_requests: NonZeroU32, window: Duration) -> Self {
        let quota = Quota::with_period(window / max_requests.get())
            .unwrap_or_else(|| Quota::per_second(max_requests))
            .allow_burst(max_requests);

        Self { limiter: Arc::new(RateLimiter::keyed(quota)) }
    }

    pub fn check(&self, ip: IpAddr) -> bool {
        self.limiter.check_key(&ip).is_ok()
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        let max_requests = NonZeroU32::new(DEFAULT_MAX_REQUESTS).unwrap_or(NonZeroU32::MIN);
        Self::new(max_requests, DEFAULT_WINDOW)
    }
}

// Sem ConnectInfo (ex.: router chamado direto nos testes) todos caem na mesma chave
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

pub async fn throttle_requests(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if !app_state.throttle.check(ip) {
        tracing::warn!(%ip, "🚫 Limite de requisições atingido");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}
