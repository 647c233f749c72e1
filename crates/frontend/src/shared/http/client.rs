//! HTTP client used by every page.
//!
//! The client is built once in the app shell from a [`Transport`] and an
//! ordered [`MiddlewareChain`], then provided through context. Responses are
//! buffered right after they arrive, so the body can be read by the
//! middleware and by the caller without either consuming it for the other.

use super::middleware::MiddlewareChain;
use async_trait::async_trait;
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Browser cache mode of a request. Requests bypass the cache unless the
/// caller picks something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    #[default]
    NoStore,
    Default,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl CachePolicy {
    fn to_web_sys(self) -> web_sys::RequestCache {
        match self {
            CachePolicy::NoStore => web_sys::RequestCache::NoStore,
            CachePolicy::Default => web_sys::RequestCache::Default,
            CachePolicy::Reload => web_sys::RequestCache::Reload,
            CachePolicy::NoCache => web_sys::RequestCache::NoCache,
            CachePolicy::ForceCache => web_sys::RequestCache::ForceCache,
            CachePolicy::OnlyIfCached => web_sys::RequestCache::OnlyIfCached,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// `None` means "not chosen by the caller".
    pub cache: Option<CachePolicy>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            cache: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the body and sets `Content-Type`.
    pub fn json<T: Serialize>(self, value: &T) -> Result<Self, String> {
        let body = serde_json::to_string(value)
            .map_err(|e| format!("Failed to serialize request: {}", e))?;
        Ok(self.header("Content-Type", "application/json").body(body))
    }

    pub fn cache(mut self, cache: CachePolicy) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn effective_cache(&self) -> CachePolicy {
        self.cache.unwrap_or_default()
    }
}

/// Fully received response. Cloning shares the buffered body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    body: Rc<[u8]>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: Rc::from(body.into()),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// 2xx
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> Result<String, String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| format!("Response body is not valid UTF-8: {}", e))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, String> {
        serde_json::from_slice(&self.body).map_err(|e| format!("Failed to parse response: {}", e))
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("Failed to build request: {0}")]
    InvalidRequest(String),
}

/// Moves a request over the wire and buffers the whole response.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Browser `fetch` through `gloo-net`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&request.url)
            .method(method)
            .cache(request.effective_cache().to_web_sys());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder.build(),
        }
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let status_text = response.status_text();
        let headers = response.headers().entries().collect::<Vec<_>>();
        // The body stream can only be read once; keep it in memory.
        let body = response
            .binary()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body: Rc::from(body),
        })
    }
}

#[derive(Clone)]
pub struct HttpClient {
    transport: Rc<dyn Transport>,
    middleware: MiddlewareChain,
}

impl HttpClient {
    pub fn new(transport: Rc<dyn Transport>, middleware: MiddlewareChain) -> Self {
        Self {
            transport,
            middleware,
        }
    }

    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }

    /// Sends `request` and lets every middleware observe the response.
    /// Transport failures skip the middleware and propagate.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self.transport.send(&request).await?;
        self.middleware.run(&request, &response);
        Ok(response)
    }
}

/// Makes `client` available to every component below the caller.
pub fn provide_http_client(client: HttpClient) {
    provide_context(StoredValue::new_local(client));
}

pub fn use_http_client() -> HttpClient {
    use_context::<StoredValue<HttpClient, LocalStorage>>()
        .expect("HttpClient not provided in context (provide it in the app shell)")
        .get_value()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// In-memory transport replaying canned outcomes.
    #[derive(Default)]
    pub struct MockTransport {
        pub outcomes: RefCell<Vec<Result<HttpResponse, TransportError>>>,
        pub seen: RefCell<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn replying(outcome: Result<HttpResponse, TransportError>) -> Rc<Self> {
            Rc::new(Self {
                outcomes: RefCell::new(vec![outcome]),
                seen: RefCell::new(Vec::new()),
            })
        }
    }

    #[async_trait(?Send)]
    impl Transport for MockTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            self.outcomes.borrow_mut().remove(0)
        }
    }
}
