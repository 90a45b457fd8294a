//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check (public)
//! - `/f/*`          - Published forms and submissions (public)
//! - `/api/*`        - Owner REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// The peer-address limiter needs connection info, so serve the result with
/// `into_make_service_with_connect_info::<SocketAddr>`.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let (api_router, public_router) = if behind_proxy {
        (
            authenticated(&state).layer(rate_limit::secure_layer_proxied()),
            api::routes::public_routes().layer(rate_limit::layer_proxied()),
        )
    } else {
        (
            authenticated(&state).layer(rate_limit::secure_layer()),
            api::routes::public_routes().layer(rate_limit::layer()),
        )
    };

    NormalizePathLayer::trim_trailing_slash().layer(compose(state, api_router, public_router))
}

/// Same routes as [`app_router`] without rate limiting or path normalization.
///
/// Used by in-process test servers, which carry no peer address.
pub fn router_without_rate_limits(state: AppState) -> Router {
    let api_router = authenticated(&state);
    let public_router = api::routes::public_routes();

    compose(state, api_router, public_router)
}

fn authenticated(state: &AppState) -> Router<AppState> {
    api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
}

fn compose(
    state: AppState,
    api_router: Router<AppState>,
    public_router: Router<AppState>,
) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(public_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
