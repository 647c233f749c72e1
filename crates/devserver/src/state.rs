use crate::shared::config::DevServerConfig;
use crate::system::health::HealthState;
use contracts::shared::dev_socket::ReloadMessage;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Shared state of the dev server, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DevServerConfig>,
    pub health: Arc<HealthState>,
    pub reload_tx: broadcast::Sender<ReloadMessage>,
}

impl AppState {
    pub fn new(config: DevServerConfig) -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self {
            config: Arc::new(config),
            health: Arc::new(HealthState::new()),
            reload_tx,
        }
    }
}
