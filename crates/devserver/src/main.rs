pub mod live_reload;
pub mod routes;
pub mod shared;
pub mod state;
pub mod system;
pub mod visual_edit;

use shared::config::{load_file_config, DevServerConfig};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use tokio::net::TcpListener;

    system::tracing::initialize()?;

    let config = DevServerConfig::from_env(load_file_config()?)?;
    tracing::info!(
        "hot reload: {}, visual edits: {}, health check: {}",
        config.hot_reload,
        config.visual_edits,
        config.health_check
    );
    if config.hot_reload {
        tracing::info!("Live reload socket for browsers: {}", config.socket.to_url());
    }

    let state = AppState::new(config);
    let _watcher = live_reload::watcher::start(state.clone())?;

    if state.config.build_command.is_some() {
        let initial = state.clone();
        tokio::spawn(async move {
            live_reload::watcher::rebuild_and_notify(&initial).await;
        });
    }

    let addr = state.config.bind;
    let app = routes::configure_routes(state);

    tracing::info!("Attempting to bind dev server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Dev server listening on http://{}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Set PORT or change [server].bind in devserver.toml.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
