//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

/// Get the base URL for API requests
///
/// Uses `BACKEND_URL` when it was set at build time, otherwise the origin
/// of the current page.
///
/// # Returns
/// - API base URL like "https://api.example.com" (no trailing slash)
/// - Empty string if window is not available
pub fn api_base() -> String {
    if let Some(url) = option_env!("BACKEND_URL") {
        return url.trim_end_matches('/').to_string();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

/// Build a full API URL from a path
///
/// # Arguments
/// * `path` - The API path (should start with "/api/")
///
/// # Example
/// ```rust,ignore
/// let url = api_url(&format!("/api/actors/{}", id));
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// URL of a single entity, with the id percent-encoded.
pub fn entity_url(collection: &str, id: &str) -> String {
    api_url(&format!("/api/{}/{}", collection, urlencoding::encode(id)))
}
