use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use contracts::shared::dev_socket::ReloadMessage;
use tokio::sync::broadcast;

use crate::state::AppState;

/// GET {socket.pathname}: pushes reload notifications to the page.
pub async fn live_reload_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| forward_reloads(socket, rx))
}

async fn forward_reloads(mut socket: WebSocket, mut rx: broadcast::Receiver<ReloadMessage>) {
    tracing::debug!("Live reload client connected");
    loop {
        tokio::select! {
            message = rx.recv() => match message {
                Ok(message) => {
                    let text = match serde_json::to_string(&message) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::warn!("Failed to encode reload message: {}", e);
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                // only the latest state matters
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
    tracing::debug!("Live reload client disconnected");
}
