//! Rate limiting middleware using token bucket algorithm.
//!
//! Limits are keyed by client IP. Direct deployments use the socket peer
//! address; behind a trusted reverse proxy the `*_proxied` variants read
//! `X-Forwarded-For`, `X-Real-IP` and `Forwarded` first.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

type Layer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Public endpoints (form view and submission).
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> Layer<PeerIpKeyExtractor> {
    build(2, 100, PeerIpKeyExtractor)
}

/// Authenticated owner endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> Layer<PeerIpKeyExtractor> {
    build(1, 10, PeerIpKeyExtractor)
}

/// [`layer`] keyed by forwarded client IP.
pub fn layer_proxied() -> Layer<SmartIpKeyExtractor> {
    build(2, 100, SmartIpKeyExtractor)
}

/// [`secure_layer`] keyed by forwarded client IP.
pub fn secure_layer_proxied() -> Layer<SmartIpKeyExtractor> {
    build(1, 10, SmartIpKeyExtractor)
}

fn build<K: KeyExtractor>(per_second: u64, burst_size: u32, key_extractor: K) -> Layer<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .key_extractor(key_extractor)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}
