use axum::http::Uri;
use contracts::shared::dev_socket::SocketDescriptor;

/// Explicit `WDS_SOCKET_*` values; each one replaces the derived value.
#[derive(Debug, Clone, Default)]
pub struct SocketOverrides {
    pub host: Option<String>,
    pub port: Option<String>,
    pub protocol: Option<String>,
}

/// Live-reload endpoint for the browser.
///
/// Starts from [`SocketDescriptor::fallback`], takes host, scheme and port
/// from `backend_url` when it parses, then applies the overrides.
/// A malformed URL or port is logged and ignored.
pub fn derive_socket(backend_url: Option<&str>, overrides: &SocketOverrides) -> SocketDescriptor {
    let mut socket = SocketDescriptor::fallback();

    if let Some(raw) = backend_url.map(str::trim).filter(|s| !s.is_empty()) {
        match parse_backend_url(raw) {
            Some((scheme, host, port)) => {
                let secure = scheme.eq_ignore_ascii_case("https");
                socket.protocol = if secure { "wss" } else { "ws" }.to_string();
                socket.hostname = host;
                socket.port = port.unwrap_or(if secure { 443 } else { 80 });
            }
            None => {
                tracing::warn!("Invalid BACKEND_URL '{}', using default WebSocket settings", raw);
            }
        }
    }

    if let Some(host) = non_empty(&overrides.host) {
        socket.hostname = host.to_string();
    }
    if let Some(port) = non_empty(&overrides.port) {
        match port.parse::<u16>() {
            Ok(port) => socket.port = port,
            Err(_) => tracing::warn!("Invalid WDS_SOCKET_PORT '{}', ignored", port),
        }
    }
    if let Some(protocol) = non_empty(&overrides.protocol) {
        socket.protocol = protocol.trim_end_matches(':').to_string();
    }

    socket
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// (scheme, host, explicit port)
fn parse_backend_url(raw: &str) -> Option<(String, String, Option<u16>)> {
    let uri: Uri = raw.parse().ok()?;
    let scheme = uri.scheme_str()?.to_string();
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }
    let host = uri.host().filter(|h| !h.is_empty())?.to_string();
    Some((scheme, host, uri.port_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(host: Option<&str>, port: Option<&str>, protocol: Option<&str>) -> SocketOverrides {
        SocketOverrides {
            host: host.map(String::from),
            port: port.map(String::from),
            protocol: protocol.map(String::from),
        }
    }

    #[test]
    fn test_https_backend_without_overrides() {
        let socket = derive_socket(Some("https://api.example.com"), &SocketOverrides::default());
        assert_eq!(
            socket,
            SocketDescriptor {
                protocol: "wss".into(),
                hostname: "api.example.com".into(),
                port: 443,
                pathname: "/ws".into(),
            }
        );
    }

    #[test]
    fn test_http_backend_with_port() {
        let socket = derive_socket(Some("http://localhost:8001/api"), &SocketOverrides::default());
        assert_eq!(socket.protocol, "ws");
        assert_eq!(socket.hostname, "localhost");
        assert_eq!(socket.port, 8001);

        let socket = derive_socket(Some("http://example.org"), &SocketOverrides::default());
        assert_eq!(socket.port, 80);
    }

    #[test]
    fn test_port_override_wins() {
        let socket = derive_socket(Some("https://api.example.com"), &overrides(None, Some("8080"), None));
        assert_eq!(socket.port, 8080);
        let socket = derive_socket(Some("http://api.example.com"), &overrides(None, Some("8080"), None));
        assert_eq!(socket.port, 8080);
    }

    #[test]
    fn test_all_overrides() {
        let socket = derive_socket(
            Some("https://api.example.com"),
            &overrides(Some("0.0.0.0"), Some("3000"), Some("ws")),
        );
        assert_eq!(socket.to_url(), "ws://0.0.0.0:3000/ws");
    }

    #[test]
    fn test_malformed_url_falls_back() {
        assert_eq!(
            derive_socket(Some("not a url"), &SocketOverrides::default()),
            SocketDescriptor::fallback()
        );
        assert_eq!(
            derive_socket(Some("ftp://files.example.com"), &SocketOverrides::default()),
            SocketDescriptor::fallback()
        );
        assert_eq!(
            derive_socket(None, &SocketOverrides::default()),
            SocketDescriptor::fallback()
        );
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let socket = derive_socket(Some("https://api.example.com"), &overrides(None, Some("http"), None));
        assert_eq!(socket.port, 443);
    }
}
