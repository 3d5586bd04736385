//! Cross-cutting request/response interceptors.

pub mod logging;
pub mod metrics;
pub mod security;

pub use logging::{AccessLog, RequestSpan, trace_layer};
pub use metrics::track_metrics;
pub use security::SECURITY_HEADERS;
