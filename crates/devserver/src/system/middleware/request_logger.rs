use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_size;

/// Probes that would flood the console at info level
fn is_probe(path: &str) -> bool {
    path == "/health/live" || path == "/health/simple"
}

/// Logs every HTTP request
///
/// Prints time, duration, response size, status, method and path.
/// WebSocket upgrades are logged without reading the body.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status().as_u16();

    if status == 101 {
        tracing::debug!("{} {} -> 101 (websocket)", method, path);
        return response;
    }

    let (parts, body) = response.into_parts();

    // body is read to know the real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} | {:>5}ms | {:>10} | {} {:>6} {} ({})",
                Local::now().format("%H:%M:%S"),
                start.elapsed().as_millis(),
                "error",
                status,
                method,
                path,
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let line = format!(
        "{} | {:>5}ms | {:>10} | {} {:>6} {}",
        Local::now().format("%H:%M:%S"),
        start.elapsed().as_millis(),
        format_size(bytes.len()),
        status,
        method,
        path
    );
    if is_probe(&path) {
        tracing::debug!("{}", line);
    } else if status >= 400 {
        tracing::warn!("{}", line);
    } else {
        tracing::info!("{}", line);
    }

    Response::from_parts(parts, Body::from(bytes))
}
