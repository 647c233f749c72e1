use contracts::shared::dev_socket::SocketDescriptor;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::socket::{derive_socket, SocketOverrides};

/// Settings read from `devserver.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileConfig {
    pub server: ServerSection,
    pub watch: WatchSection,
    #[serde(default)]
    pub build: BuildSection,
    pub visual_edit: VisualEditSection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSection {
    pub bind: String,
    pub dist_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WatchSection {
    pub dirs: Vec<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BuildSection {
    pub command: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VisualEditSection {
    pub source_root: String,
}

fn default_debounce_ms() -> u64 {
    300
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
bind = "127.0.0.1:8080"
dist_dir = "dist"

[watch]
dirs = ["crates/frontend/src", "crates/frontend/style", "crates/frontend/index.html"]
debounce_ms = 300

[build]
command = "trunk build"

[visual_edit]
source_root = "crates/frontend/src"
"#;

pub const ENV_DISABLE_HOT_RELOAD: &str = "DISABLE_HOT_RELOAD";
pub const ENV_ENABLE_VISUAL_EDITS: &str = "ENABLE_VISUAL_EDITS";
pub const ENV_ENABLE_HEALTH_CHECK: &str = "ENABLE_HEALTH_CHECK";
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
pub const ENV_SOCKET_HOST: &str = "WDS_SOCKET_HOST";
pub const ENV_SOCKET_PORT: &str = "WDS_SOCKET_PORT";
pub const ENV_SOCKET_PROTOCOL: &str = "WDS_SOCKET_PROTOCOL";
pub const ENV_PORT: &str = "PORT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid bind address '{0}'")]
    InvalidBind(String),
    #[error("invalid {name} value '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

/// Effective dev server settings: file config with environment flags applied.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    pub bind: SocketAddr,
    pub dist_dir: PathBuf,
    /// File watching plus browser live reload
    pub hot_reload: bool,
    pub watch_dirs: Vec<PathBuf>,
    pub debounce: Duration,
    pub build_command: Option<String>,
    pub visual_edits: bool,
    pub source_root: PathBuf,
    pub health_check: bool,
    pub socket: SocketDescriptor,
}

/// `true`, `1`, `yes`, `on` (any case)
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl DevServerConfig {
    pub fn from_lookup<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).map(|v| is_truthy(&v)).unwrap_or(false);

        let mut bind: SocketAddr = file
            .server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidBind(file.server.bind.clone()))?;
        if let Some(port) = lookup(ENV_PORT) {
            let port = port.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port.clone(),
            })?;
            bind.set_port(port);
        }

        let hot_reload = !flag(ENV_DISABLE_HOT_RELOAD);
        let watch_dirs = if hot_reload {
            file.watch.dirs.iter().map(PathBuf::from).collect()
        } else {
            Vec::new()
        };

        let backend_url = lookup(ENV_BACKEND_URL);
        let overrides = SocketOverrides {
            host: lookup(ENV_SOCKET_HOST),
            port: lookup(ENV_SOCKET_PORT),
            protocol: lookup(ENV_SOCKET_PROTOCOL),
        };
        let socket = derive_socket(backend_url.as_deref(), &overrides);

        Ok(Self {
            bind,
            dist_dir: PathBuf::from(&file.server.dist_dir),
            hot_reload,
            watch_dirs,
            debounce: Duration::from_millis(file.watch.debounce_ms),
            build_command: file
                .build
                .command
                .filter(|c| !c.trim().is_empty() && hot_reload),
            visual_edits: flag(ENV_ENABLE_VISUAL_EDITS),
            source_root: PathBuf::from(&file.visual_edit.source_root),
            health_check: flag(ENV_ENABLE_HEALTH_CHECK),
            socket,
        })
    }

    pub fn from_env(file: FileConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(file, |name| std::env::var(name).ok())
    }
}

/// Load configuration from devserver.toml
///
/// Search order:
/// 1. Next to the executable
/// 2. Current working directory
/// 3. Falls back to embedded default config
pub fn load_file_config() -> Result<FileConfig, ConfigError> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("devserver.toml"));
        }
    }
    candidates.push(PathBuf::from("devserver.toml"));

    for path in candidates {
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            return read_file_config(&path);
        }
    }

    tracing::info!("Using default embedded configuration");
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
pub(crate) fn default_file_config() -> FileConfig {
    toml::from_str(DEFAULT_CONFIG).unwrap()
}
