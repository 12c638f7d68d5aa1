//! Health check handler

/// Service liveness probe
pub async fn health_check() -> &'static str {
    "OK"
}
