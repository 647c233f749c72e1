use serde::{Deserialize, Serialize};

/// Uniform outcome of a JSON request.
///
/// Every failure (HTTP status, unreadable body, unreachable server) is folded
/// into this shape instead of being raised. `status` is 0 when no response
/// was received at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult<T> {
    pub ok: bool,
    pub status: u16,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> FetchResult<T> {
    pub fn success(status: u16, data: T) -> Self {
        Self {
            ok: true,
            status,
            data: Some(data),
            error: None,
        }
    }

    pub fn http_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::http_error(0, message)
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.ok, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .unwrap_or_else(|| format!("Request failed: {}", self.status))),
        }
    }
}
