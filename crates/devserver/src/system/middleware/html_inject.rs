use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::config::DevServerConfig;
use crate::state::AppState;
use crate::visual_edit::CLIENT_SCRIPT_PATH;

/// Scripts the dev server adds to every HTML page.
pub fn dev_snippets(config: &DevServerConfig) -> String {
    let mut snippets = String::new();
    if config.hot_reload {
        snippets.push_str(&live_reload_script(&config.socket.to_url()));
    }
    if config.visual_edits {
        snippets.push_str(&format!(r#"<script src="{}"></script>"#, CLIENT_SCRIPT_PATH));
    }
    snippets
}

fn live_reload_script(url: &str) -> String {
    format!(
        r#"<script>(function(){{var url={url};function connect(){{var ws=new WebSocket(url);ws.onmessage=function(e){{var m=JSON.parse(e.data);if(m.type==="reload"){{location.reload();}}else if(m.type==="build-error"){{console.error("[devserver] build failed:\n"+m.message);}}}};ws.onclose=function(){{setTimeout(connect,1000);}};}}connect();}})();</script>"#,
        url = serde_json::Value::String(url.to_string())
    )
}

/// Inserts `snippet` before the last `</body>`, or appends it.
pub fn inject_before_body_end(html: &str, snippet: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + snippet.len());
            out.push_str(&html[..pos]);
            out.push_str(snippet);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{}{}", html, snippet),
    }
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("text/html"))
        .unwrap_or(false)
}

/// Middleware: adds live-reload / visual-edit scripts to HTML responses.
pub async fn inject_dev_scripts(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;
    let snippets = dev_snippets(&state.config);
    // partial and error responses are passed through untouched
    if snippets.is_empty() || response.status() != StatusCode::OK || !is_html(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Failed to read HTML body for injection: {}", e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let html = String::from_utf8_lossy(&bytes);
    let injected = inject_before_body_end(&html, &snippets);
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(injected))
}
