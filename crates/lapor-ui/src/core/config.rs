//! API location for the browser build.

/// Port the backend listens on when the base is derived from the page origin.
pub const BACKEND_PORT: u16 = 8000;

/// Base URL baked in at compile time, if any.
#[must_use]
pub fn compiled_api_base() -> Option<&'static str> {
    option_env!("LAPOR_API_URL")
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// `<protocol>//<hostname>:8000/api` for the page the app is served from.
#[must_use]
pub fn api_base_for_origin(protocol: &str, hostname: &str) -> String {
    let protocol = if protocol.is_empty() { "http:" } else { protocol };
    let hostname = if hostname.is_empty() {
        "127.0.0.1"
    } else {
        hostname
    };
    format!("{protocol}//{hostname}:{BACKEND_PORT}/api")
}
