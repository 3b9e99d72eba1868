use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::{broadcast, Mutex};

use crate::response::AppError;
use crate::state::AppState;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u64,
    window_start: Instant,
}

/// 按客户端 IP 的固定窗口计数器
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u64,
    entries: Arc<Mutex<HashMap<IpAddr, WindowEntry>>>,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// 窗口重置时刻（unix 秒）
    pub reset_at: u64,
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_requests: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs.max(1)),
            max_requests,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn check(&self, ip: IpAddr) -> RateLimitDecision {
        self.check_at(ip, Instant::now()).await
    }

    async fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitDecision {
        let mut map = self.entries.lock().await;
        let entry = map.entry(ip).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= self.window {
            *entry = WindowEntry {
                count: 0,
                window_start: now,
            };
        }

        let allowed = entry.count < self.max_requests;
        if allowed {
            entry.count += 1;
        }

        let reset_after = self
            .window
            .saturating_sub(now.duration_since(entry.window_start))
            .as_secs();
        let unix_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        RateLimitDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_at: unix_now + reset_after,
        }
    }

    /// 清除两个窗口以上未活动的条目
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let stale_after = self.window * 2;
        let mut map = self.entries.lock().await;
        let before = map.len();
        map.retain(|_, entry| now.duration_since(entry.window_start) <= stale_after);
        before - map.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.entries.lock().await.len()
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let ip = extract_client_ip(req.headers(), peer, state.config().trust_proxy);
    let decision = state.rate_limiter().check(ip).await;

    if !decision.allowed {
        tracing::warn!(client_ip = %ip, path = %req.uri().path(), "Rate limit exceeded");
        let mut response =
            AppError::too_many_requests("Too many requests, please slow down").into_response();
        apply_rate_limit_headers(response.headers_mut(), &decision);
        let retry_after = decision.reset_at.saturating_sub(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        );
        response
            .headers_mut()
            .insert("retry-after", HeaderValue::from(retry_after.max(1)));
        return response;
    }

    let mut response = next.run(req).await;
    apply_rate_limit_headers(response.headers_mut(), &decision);
    response
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(decision.reset_at));
}

/// 仅在 `trust_proxy` 时信任 x-forwarded-for / x-real-ip，否则使用连接对端地址
pub fn extract_client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok());
        if let Some(ip) = real_ip {
            return ip;
        }
    }

    peer.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

pub async fn rate_limit_cleanup_loop(
    limiter: RateLimiter,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = limiter.cleanup().await;
                if removed > 0 {
                    tracing::debug!(removed, "Rate limiter entries evicted");
                }
            }
            _ = shutdown_rx.recv() => {
                tracing::debug!("Rate limiter cleanup loop stopped");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn limit_is_enforced_per_ip() {
        let limiter = RateLimiter::new(60, 2);
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limiter.check(a).await.allowed);
        let second = limiter.check(a).await;
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);
        assert!(!limiter.check(a).await.allowed);
        assert!(limiter.check(b).await.allowed);
    }

    #[tokio::test]
    async fn window_expiry_resets_count() {
        let limiter = RateLimiter::new(1, 1);
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let start = Instant::now();

        assert!(limiter.check_at(ip, start).await.allowed);
        assert!(!limiter.check_at(ip, start).await.allowed);
        assert!(
            limiter
                .check_at(ip, start + Duration::from_millis(1_100))
                .await
                .allowed
        );
    }

    #[tokio::test]
    async fn cleanup_keeps_recent_clients() {
        let limiter = RateLimiter::new(60, 5);
        limiter.check(IpAddr::V4(Ipv4Addr::LOCALHOST)).await;
        assert_eq!(limiter.cleanup().await, 0);
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[test]
    fn forwarded_headers_ignored_without_trust_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        let peer = Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 4)));

        assert_eq!(extract_client_ip(&headers, peer, false), peer.unwrap());
        assert_eq!(
            extract_client_ip(&headers, peer, true),
            "203.0.113.9".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn missing_peer_falls_back_to_localhost() {
        let ip = extract_client_ip(&HeaderMap::new(), None, false);
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
}
