//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-IP rate limiting with tower_governor. The Generic Cell Rate Algorithm
//! enforces the quota without background tasks.

use crate::config::RateLimitSettings;
use governor::middleware::StateInformationMiddleware;
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config keyed by peer IP, emitting X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Build a governor config from the rate limit settings.
///
/// Returns `None` when `per_second` or `burst_size` is zero. The service must
/// be served with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// peer IP can be extracted.
pub fn create_governor_config(settings: &RateLimitSettings) -> Option<Arc<DefaultGovernorConfig>> {
    GovernorConfigBuilder::default()
        .per_second(settings.per_second)
        .burst_size(settings.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
}
