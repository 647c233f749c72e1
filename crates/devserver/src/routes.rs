use axum::http::{header, Method};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::live_reload::socket::live_reload_ws;
use crate::state::AppState;
use crate::system::health;
use crate::system::middleware::html_inject::inject_dev_scripts;
use crate::system::middleware::request_logger::request_logger;
use crate::visual_edit;

/// All dev server routes
///
/// Optional endpoints are mounted only when their flag is on; everything
/// else falls through to the built SPA, with `index.html` for client routes.
pub fn configure_routes(state: AppState) -> Router {
    let config = state.config.clone();
    let mut router = Router::new();

    if config.health_check {
        router = router
            .route("/health", get(health::health))
            .route("/health/simple", get(health::simple))
            .route("/health/ready", get(health::ready))
            .route("/health/live", get(health::live));
    }

    if config.hot_reload {
        router = router.route(&config.socket.pathname, get(live_reload_ws));
    }

    if config.visual_edits {
        router = router
            .route(visual_edit::CLIENT_SCRIPT_PATH, get(visual_edit::client_js))
            .route(visual_edit::EDIT_PATH, post(visual_edit::edit));
    }

    let spa = ServeDir::new(&config.dist_dir)
        .fallback(ServeFile::new(config.dist_dir.join("index.html")));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    router
        .fallback_service(spa)
        .layer(middleware::from_fn_with_state(state.clone(), inject_dev_scripts))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::{default_file_config, DevServerConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use contracts::shared::dev_socket::ReloadMessage;
    use futures_util::StreamExt;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const INDEX_HTML: &str = "<html><body><div id=app></div></body></html>";

    struct TestApp {
        router: Router,
        state: AppState,
        _dist: TempDir,
        src: TempDir,
    }

    fn test_app(vars: &[(&str, &str)]) -> TestApp {
        let dist = tempfile::tempdir().unwrap();
        std::fs::write(dist.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(dist.path().join("app.js"), "console.log(1);").unwrap();
        let src = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src.path().join("pages")).unwrap();

        let env: HashMap<&str, &str> = vars.iter().cloned().collect();
        let mut config =
            DevServerConfig::from_lookup(default_file_config(), |k| env.get(k).map(|v| v.to_string()))
                .unwrap();
        config.dist_dir = dist.path().to_path_buf();
        config.source_root = src.path().to_path_buf();

        let state = AppState::new(config);
        TestApp {
            router: configure_routes(state.clone()),
            state,
            _dist: dist,
            src,
        }
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, String, String) {
        let response = router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_edit(router: &Router, body: Value) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(
                Request::post(visual_edit::EDIT_PATH)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_routes_fall_back_to_index_with_reload_script() {
        let app = test_app(&[]);
        let (status, content_type, body) = get(&app.router, "/actor/a1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert!(body.starts_with("<html><body><div id=app></div><script>"));
        assert!(body.contains("wss://localhost:443/ws"));
        assert!(body.ends_with("</script></body></html>"));
    }

    #[tokio::test]
    async fn test_assets_are_served_untouched() {
        let app = test_app(&[]);
        let (status, _, body) = get(&app.router, "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1);");
    }

    #[tokio::test]
    async fn test_range_request_is_not_injected() {
        let app = test_app(&[]);
        let response = app
            .router
            .clone()
            .oneshot(
                Request::get("/index.html")
                    .header(header::RANGE, "bytes=0-9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html><bod");
    }

    #[tokio::test]
    async fn test_disabled_features_are_not_mounted() {
        let app = test_app(&[("DISABLE_HOT_RELOAD", "true")]);

        for uri in ["/health/simple", "/ws", visual_edit::CLIENT_SCRIPT_PATH] {
            let (status, content_type, body) = get(&app.router, uri).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(content_type.starts_with("text/html"), "{}", uri);
            assert_eq!(body, INDEX_HTML, "{}", uri);
        }

        let response = app
            .router
            .clone()
            .oneshot(
                Request::post(visual_edit::EDIT_PATH)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(!response.status().is_success());
    }

    #[tokio::test]
    async fn test_enabled_features_are_mounted() {
        let app = test_app(&[("ENABLE_HEALTH_CHECK", "true"), ("ENABLE_VISUAL_EDITS", "true")]);

        let (status, _, body) = get(&app.router, "/health/simple").await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "OK"));

        let (_, _, body) = get(&app.router, "/health/live").await;
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "status": "alive" }));

        let (status, content_type, body) = get(&app.router, visual_edit::CLIENT_SCRIPT_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("application/javascript"));
        assert!(body.contains(visual_edit::EDIT_PATH));

        let (_, _, page) = get(&app.router, "/").await;
        assert!(page.contains(visual_edit::CLIENT_SCRIPT_PATH));

        // plain GET without upgrade headers is refused by the socket route
        let (status, _, _) = get(&app.router, "/ws").await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_ready_reflects_last_build() {
        let app = test_app(&[("ENABLE_HEALTH_CHECK", "true")]);
        let (status, _, _) = get(&app.router, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);

        app.state
            .health
            .build_finished(&Err("boom".into()), std::time::Duration::from_millis(5));
        let (status, _, body) = get(&app.router, "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("boom"));
    }

    #[tokio::test]
    async fn test_edit_endpoint_statuses() {
        let app = test_app(&[("ENABLE_VISUAL_EDITS", "true")]);
        let src = app.src.path();
        std::fs::write(src.join("pages/home.rs"), "\"Actor Console\" \"Delete\"").unwrap();
        std::fs::write(src.join("pages/actor.rs"), "\"Delete\"").unwrap();

        let (status, body) = post_edit(
            &app.router,
            json!({ "file": "../outside.rs", "old_text": "a", "new_text": "b" }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].as_str().unwrap().contains("outside"));

        let (status, _) = post_edit(
            &app.router,
            json!({ "file": "pages/missing.rs", "old_text": "a", "new_text": "b" }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = post_edit(&app.router, json!({ "old_text": "Delete", "new_text": "Remove" })).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = post_edit(&app.router, json!({ "old_text": "Nowhere", "new_text": "x" })).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = post_edit(
            &app.router,
            json!({ "old_text": "Actor Console", "new_text": "Actors" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file"], "pages/home.rs");
        assert_eq!(
            std::fs::read_to_string(src.join("pages/home.rs")).unwrap(),
            "\"Actors\" \"Delete\""
        );
    }

    #[tokio::test]
    async fn test_socket_pushes_reload_messages() {
        let app = test_app(&[]);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = app.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", addr))
            .await
            .unwrap();

        app.state.reload_tx.send(ReloadMessage::Reload).unwrap();
        let message = ws.next().await.unwrap().unwrap();
        assert_eq!(message.into_text().unwrap(), r#"{"type":"reload"}"#);

        app.state
            .reload_tx
            .send(ReloadMessage::BuildError {
                message: "error[E0425]".into(),
            })
            .unwrap();
        let message = ws.next().await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&message.into_text().unwrap()).unwrap();
        assert_eq!(value, json!({ "type": "build-error", "message": "error[E0425]" }));
    }
}
