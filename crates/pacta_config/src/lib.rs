//! Shared runtime configuration, resolved once from the environment.

use lazy_static::lazy_static;

lazy_static! {
    /// Public base URL of the dev peer, used when building links in
    /// API responses. Override with `PACTA_BASE_URL`.
    pub static ref BASE_URL: String = std::env::var("PACTA_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    /// Socket address the dev peer binds to. Override with `PACTA_BIND_ADDR`.
    pub static ref BIND_ADDR: String = std::env::var("PACTA_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());
}
