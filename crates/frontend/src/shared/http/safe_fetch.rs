//! Request helpers whose responses can be read safely by several consumers.

use super::client::{CachePolicy, HttpClient, HttpRequest, HttpResponse, TransportError};
use contracts::shared::fetch_result::FetchResult;
use serde::de::DeserializeOwned;

/// Sends `request` with caching disabled unless the caller chose a policy,
/// and returns a duplicate of the buffered response.
///
/// Transport failures propagate; HTTP error statuses do not.
pub async fn safe_fetch(
    client: &HttpClient,
    mut request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    if request.cache.is_none() {
        request.cache = Some(CachePolicy::NoStore);
    }
    let response = client.send(request).await?;
    Ok(response.clone())
}

/// JSON variant of [`safe_fetch`]; never fails, every outcome is a
/// [`FetchResult`].
pub async fn safe_fetch_json<T: DeserializeOwned>(
    client: &HttpClient,
    request: HttpRequest,
) -> FetchResult<T> {
    let response = match safe_fetch(client, request).await {
        Ok(response) => response,
        Err(e) => return FetchResult::network_error(e.to_string()),
    };

    if !response.ok() {
        return FetchResult::http_error(response.status, http_error_message(&response));
    }

    match response.json::<T>() {
        Ok(data) => FetchResult::success(response.status, data),
        Err(e) => FetchResult::http_error(response.status, e),
    }
}

fn http_error_message(response: &HttpResponse) -> String {
    let mut message = format!("HTTP error! status: {}", response.status);
    // unreadable body: status only
    if let Ok(text) = response.text() {
        if !text.is_empty() {
            message.push_str(", message: ");
            message.push_str(&text);
        }
    }
    message
}
