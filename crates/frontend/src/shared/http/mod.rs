//! HTTP layer: explicit client, response middleware and safe fetch helpers.

pub mod client;
pub mod middleware;
pub mod not_found;
pub mod route_classifier;
pub mod safe_fetch;

pub use client::{provide_http_client, use_http_client, HttpClient, HttpRequest, HttpResponse};
pub use safe_fetch::{safe_fetch, safe_fetch_json};
