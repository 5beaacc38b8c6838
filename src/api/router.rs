//! HTTP routing configuration with scrape rate limiting.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, Response, StatusCode},
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
};
use governor::{Quota, RateLimiter};
use tower::ServiceBuilder;
use tower_http::{
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{liveness_handler, metrics_handler, readiness_handler, root_handler};

/// Rate limiter configuration for the scrape endpoint.
///
/// Every accepted scrape triggers a full round of exchange calls, so
/// limiting inbound scrapes bounds outbound call volume before the
/// exchange's own limiter would reject us fatally.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Scrapes per second.
    pub scrape_rps: u32,
    /// Burst size.
    pub scrape_burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            scrape_rps: 5,
            scrape_burst: 10,
        }
    }
}

impl RateLimitConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let scrape_rps = std::env::var("BINANCE_EXPORTER_SCRAPE_RPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let scrape_burst = std::env::var("BINANCE_EXPORTER_SCRAPE_BURST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            scrape_rps,
            scrape_burst,
        }
    }
}

/// Shared rate limiter state (keyed by client IP to prevent global DoS)
pub struct RateLimitState {
    scrape_limiter: governor::RateLimiter<
        IpAddr,
        governor::state::keyed::DashMapStateStore<IpAddr>,
        governor::clock::DefaultClock,
    >,
}

impl RateLimitState {
    pub fn new(config: &RateLimitConfig) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(config.scrape_rps.max(1)).unwrap())
            .allow_burst(NonZeroU32::new(config.scrape_burst.max(1)).unwrap());
        Self {
            scrape_limiter: RateLimiter::dashmap(quota),
        }
    }
}

/// Extract client IP from request (X-Forwarded-For, X-Real-IP, or ConnectInfo).
/// Falls back to 0.0.0.0 when unknown; unknown clients share one bucket.
fn client_ip_from_request<B>(request: &Request<B>) -> IpAddr {
    if let Some(forwarded) = request.headers().get("x-forwarded-for") {
        if let Ok(s) = forwarded.to_str() {
            if let Some(first) = s.split(',').next() {
                if let Ok(ip) = first.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }
    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(s) = real_ip.to_str() {
            if let Ok(ip) = s.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }
    if let Some(addr) = request.extensions().get::<SocketAddr>() {
        return addr.ip();
    }
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

/// Per-IP rate limit middleware for the scrape endpoint.
async fn rate_limit_scrape_middleware(
    State(rate_limit): State<Arc<RateLimitState>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let client_ip = client_ip_from_request(&request);
    match rate_limit.scrape_limiter.check_key(&client_ip) {
        Ok(_) => next.run(request).await,
        Err(not_until) => {
            let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                &governor::clock::DefaultClock::default(),
            ));
            let retry_after = wait_time.as_secs();

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                "scrape rate limit exceeded\n",
            )
                .into_response();
            response
                .headers_mut()
                .insert("Retry-After", retry_after.to_string().parse().unwrap());
            response
        }
    }
}

/// Create router without rate limiting.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .layer(middleware)
        .with_state(app_state)
}

/// Create router with scrape rate limiting enabled.
pub fn create_router_with_rate_limit(app_state: Arc<AppState>, config: &RateLimitConfig) -> Router {
    let rate_limit_state = Arc::new(RateLimitState::new(config));

    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    // Only scrape routes are limited; probe endpoints stay cheap and open.
    let scrape_routes = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&rate_limit_state),
            rate_limit_scrape_middleware,
        ));

    let health_routes = Router::new()
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler));

    Router::new()
        .merge(scrape_routes)
        .nest("/health", health_routes)
        .layer(middleware)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
    };
    use std::sync::Arc;
    use tokio::sync::watch;
    use tower::ServiceExt;

    use super::*;
    use crate::app::WalletCollector;
    use crate::domain::{ExchangeApi, HttpMethod};
    use crate::test_utils::MockExchangeApi;

    fn test_state(mock: Arc<MockExchangeApi>) -> Arc<AppState> {
        let (tx, _rx) = watch::channel(false);
        let api: Arc<dyn ExchangeApi> = mock;
        let collector = Arc::new(WalletCollector::new(Arc::clone(&api), "binance-exporter"));
        Arc::new(AppState::new(collector, api, tx))
    }

    fn full_mock() -> Arc<MockExchangeApi> {
        let mock = Arc::new(MockExchangeApi::new());
        mock.respond(
            HttpMethod::Get,
            "/sapi/v1/simple-earn/flexible/position",
            r#"{"rows":[]}"#,
        );
        mock.respond(
            HttpMethod::Get,
            "/sapi/v1/simple-earn/locked/position",
            r#"{"rows":[]}"#,
        );
        mock.respond(HttpMethod::Post, "/sapi/v1/asset/get-funding-asset", "[]");
        mock.respond(HttpMethod::Post, "/sapi/v3/asset/getUserAsset", "[]");
        mock
    }

    mod rate_limit_config_tests {
        use super::*;

        #[test]
        fn test_rate_limit_config_default() {
            let config = RateLimitConfig::default();
            assert_eq!(config.scrape_rps, 5);
            assert_eq!(config.scrape_burst, 10);
        }

        // Note: from_env tests are skipped because std::env::set_var/remove_var
        // are unsafe in Rust 2024 edition

        #[test]
        fn test_rate_limit_config_clone() {
            let config = RateLimitConfig {
                scrape_rps: 1,
                scrape_burst: 2,
            };
            let cloned = config.clone();
            assert_eq!(cloned.scrape_rps, 1);
            assert_eq!(cloned.scrape_burst, 2);
        }
    }

    mod middleware_tests {
        use super::*;

        async fn dummy_handler() -> impl IntoResponse {
            StatusCode::OK
        }

        fn limited_app(rps: u32, burst: u32) -> Router {
            let state = Arc::new(RateLimitState::new(&RateLimitConfig {
                scrape_rps: rps,
                scrape_burst: burst,
            }));
            Router::new()
                .route("/", get(dummy_handler))
                .layer(middleware::from_fn_with_state(
                    state,
                    rate_limit_scrape_middleware,
                ))
        }

        #[tokio::test]
        async fn test_rate_limit_blocks_second_request() {
            let app = limited_app(1, 1);

            app.clone()
                .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                .await
                .unwrap();

            let response = app
                .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
            assert!(response.headers().contains_key("Retry-After"));
        }

        #[tokio::test]
        async fn test_rate_limit_allows_within_quota() {
            let app = limited_app(100, 100);

            for _ in 0..10 {
                let response = app
                    .clone()
                    .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                    .await
                    .unwrap();
                assert_eq!(response.status(), StatusCode::OK);
            }
        }

        /// One IP exhausting its quota must not block another.
        #[tokio::test]
        async fn test_rate_limit_is_per_ip() {
            let app = limited_app(1, 1);

            let req = |ip: &str| {
                Request::builder()
                    .uri("/")
                    .header("X-Forwarded-For", ip)
                    .body(Body::empty())
                    .unwrap()
            };

            app.clone().oneshot(req("192.168.1.1")).await.unwrap();
            let blocked = app.clone().oneshot(req("192.168.1.1")).await.unwrap();
            assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

            let other = app.oneshot(req("10.0.0.1")).await.unwrap();
            assert_eq!(other.status(), StatusCode::OK);
        }
    }

    mod router_tests {
        use super::*;

        #[tokio::test]
        async fn test_root_redirects_to_metrics() {
            let router = create_router(test_state(full_mock()));

            let res = router
                .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert!(res.status().is_redirection());
            assert_eq!(res.headers().get("location").unwrap(), "/metrics");
        }

        #[tokio::test]
        async fn test_metrics_endpoint_serves_exposition() {
            let router = create_router(test_state(full_mock()));

            let res = router
                .oneshot(
                    Request::builder()
                        .uri("/metrics")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::OK);
            assert!(
                res.headers()
                    .get("content-type")
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .starts_with("text/plain")
            );
        }

        #[tokio::test]
        async fn test_liveness_endpoint() {
            let router = create_router(test_state(full_mock()));

            let res = router
                .oneshot(
                    Request::builder()
                        .uri("/health/live")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_readiness_endpoint_ok_when_clock_reachable() {
            let router = create_router(test_state(full_mock()));

            let res = router
                .oneshot(
                    Request::builder()
                        .uri("/health/ready")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn test_readiness_endpoint_unavailable_when_clock_down() {
            let router = create_router(test_state(Arc::new(MockExchangeApi::failing(
                "connection refused",
            ))));

            let res = router
                .oneshot(
                    Request::builder()
                        .uri("/health/ready")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        }

        #[tokio::test]
        async fn test_rate_limited_router_keeps_probes_open() {
            let config = RateLimitConfig {
                scrape_rps: 1,
                scrape_burst: 1,
            };
            let router = create_router_with_rate_limit(test_state(full_mock()), &config);

            for _ in 0..5 {
                let res = router
                    .clone()
                    .oneshot(
                        Request::builder()
                            .uri("/health/live")
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                assert_eq!(res.status(), StatusCode::OK);
            }
        }

        #[tokio::test]
        async fn test_rate_limited_router_limits_scrapes() {
            let config = RateLimitConfig {
                scrape_rps: 1,
                scrape_burst: 1,
            };
            let router = create_router_with_rate_limit(test_state(full_mock()), &config);

            let first = router
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/metrics")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(first.status(), StatusCode::OK);

            let second = router
                .oneshot(
                    Request::builder()
                        .uri("/metrics")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        }
    }
}
