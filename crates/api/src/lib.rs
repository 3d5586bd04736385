//! Demo web service: health check, build info, hardcoded-credential login,
//! a static user list and Prometheus metrics.
//!
//! Every request passes through request-id tagging, access logging, default
//! security headers, CORS and metrics collection before reaching its handler.
//! Panics inside handlers become 500 responses whose detail depends on the
//! configured [`ErrorPolicy`](error::ErrorPolicy).

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;

pub use config::{Config, Environment};
pub use error::{ApiError, ErrorPolicy};
pub use state::AppState;
pub use telemetry::HttpMetrics;

/// Creates the Axum application router with all routes, middleware and
/// shared state.
pub fn create_app(state: Arc<AppState>) -> Router {
    let metrics = state.metrics.clone();
    let error_policy = state.error_policy;
    with_middleware(router(state), metrics, error_policy)
}

/// The bare route table, including the 404 fallback.
pub fn router(state: Arc<AppState>) -> Router {
    let metrics_router = Router::new()
        .route(
            "/metrics",
            get(routes::metrics::get).fallback(routes::not_found),
        )
        .with_state(state.metrics.clone());

    Router::new()
        .route(
            "/api/health",
            get(routes::health::check).fallback(routes::not_found),
        )
        .route("/api/info", get(routes::info::get).fallback(routes::not_found))
        .route(
            "/api/login",
            post(routes::auth::login).fallback(routes::not_found),
        )
        .route(
            "/api/users",
            get(routes::users::list).fallback(routes::not_found),
        )
        .route("/", get(routes::pages::index).fallback(routes::not_found))
        .route("/login", get(routes::pages::login).fallback(routes::not_found))
        .route(
            "/support",
            get(routes::pages::support).fallback(routes::not_found),
        )
        .route(
            "/index.html",
            get(routes::pages::index).fallback(routes::not_found),
        )
        .route(
            "/login.html",
            get(routes::pages::login).fallback(routes::not_found),
        )
        .route(
            "/support.html",
            get(routes::pages::support).fallback(routes::not_found),
        )
        .with_state(state)
        .merge(metrics_router)
        .fallback(routes::not_found)
}

/// Wraps a router in the middleware chain, innermost first: panic capture,
/// metrics, CORS, security headers, access log, request id.
pub fn with_middleware(router: Router, metrics: HttpMetrics, error_policy: ErrorPolicy) -> Router {
    let mut app = router
        .layer(CatchPanicLayer::custom(error_policy))
        .layer(axum::middleware::from_fn_with_state(
            metrics,
            middleware::track_metrics,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    for (name, value) in middleware::SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        ));
    }

    app.layer(middleware::trace_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Creates the default application state and its metrics registry.
pub fn create_default_state(
    config: &Config,
) -> Result<Arc<AppState>, metrics_exporter_prometheus::BuildError> {
    let metrics = HttpMetrics::new()?;
    Ok(AppState::from_config(config, metrics))
}
