use contracts::shared::dev_socket::ReloadMessage;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::state::AppState;

/// Keeps the watcher alive; dropping it stops watching.
pub struct WatchHandle {
    _debouncer: Debouncer<RecommendedWatcher>,
    task: JoinHandle<()>,
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Configured watch paths that exist on disk.
pub fn existing_watch_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .filter(|dir| {
            let exists = dir.exists();
            if !exists {
                tracing::warn!("Watch path {} does not exist, skipped", dir.display());
            }
            exists
        })
        .cloned()
        .collect()
}

/// Starts watching when hot reload is on. `None` when there is nothing to watch.
pub fn start(state: AppState) -> anyhow::Result<Option<WatchHandle>> {
    if !state.config.hot_reload {
        tracing::info!("Hot reload disabled, file watching is off");
        return Ok(None);
    }

    let dirs = existing_watch_dirs(&state.config.watch_dirs);
    if dirs.is_empty() {
        tracing::warn!("No watch paths exist, live reload will not trigger");
        return Ok(None);
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<PathBuf>>();
    let mut debouncer = new_debouncer(state.config.debounce, move |result: DebounceEventResult| {
        match result {
            Ok(events) => {
                let changed: Vec<PathBuf> = events.into_iter().map(|event| event.path).collect();
                if !changed.is_empty() {
                    let _ = tx.send(changed);
                }
            }
            Err(err) => tracing::warn!("Watcher error: {}", err),
        }
    })?;

    for dir in &dirs {
        let mode = if dir.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(dir, mode)?;
        tracing::info!("Watching {}", dir.display());
    }

    let task = tokio::spawn(async move {
        while let Some(changed) = rx.recv().await {
            tracing::info!(
                "{} file(s) changed, first: {}",
                changed.len(),
                changed[0].display()
            );
            rebuild_and_notify(&state).await;
        }
    });

    Ok(Some(WatchHandle {
        _debouncer: debouncer,
        task,
    }))
}

/// Runs the build command (if any), records the outcome and tells the
/// browsers to reload or shows them the build error.
pub async fn rebuild_and_notify(state: &AppState) {
    if let Some(command) = state.config.build_command.as_deref() {
        state.health.build_started();
        let started = Instant::now();
        let result = run_build(command).await;
        state.health.build_finished(&result, started.elapsed());

        if let Err(message) = result {
            tracing::error!("Build failed: {}", message);
            let _ = state.reload_tx.send(ReloadMessage::BuildError { message });
            return;
        }
        tracing::info!("Build finished in {}ms", started.elapsed().as_millis());
    }
    let _ = state.reload_tx.send(ReloadMessage::Reload);
}

async fn run_build(command: &str) -> Result<(), String> {
    let words = shell_words::split(command)
        .map_err(|e| format!("invalid build command '{}': {}", command, e))?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| "empty build command".to_string())?;

    let output = tokio::process::Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| format!("failed to start '{}': {}", program, e))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let tail: Vec<&str> = stderr.lines().rev().take(20).collect();
    let tail: Vec<&str> = tail.into_iter().rev().collect();
    Err(format!(
        "'{}' exited with {}\n{}",
        command,
        output.status,
        tail.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::{default_file_config, DevServerConfig};
    use crate::system::health::BuildStatus;

    fn state_with_command(command: Option<&str>) -> AppState {
        let mut config = DevServerConfig::from_lookup(default_file_config(), |_| None).unwrap();
        config.build_command = command.map(String::from);
        AppState::new(config)
    }

    #[test]
    fn test_missing_watch_paths_are_skipped() {
        let existing = std::env::temp_dir();
        let missing = existing.join("devserver-definitely-missing-dir");
        assert_eq!(
            existing_watch_dirs(&[existing.clone(), missing]),
            vec![existing]
        );
    }

    #[tokio::test]
    async fn test_reload_without_build_command() {
        let state = state_with_command(None);
        let mut rx = state.reload_tx.subscribe();
        rebuild_and_notify(&state).await;
        assert_eq!(rx.recv().await.unwrap(), ReloadMessage::Reload);
        assert_eq!(state.health.build_report().status, BuildStatus::Idle);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_build_reloads() {
        let state = state_with_command(Some("true"));
        let mut rx = state.reload_tx.subscribe();
        rebuild_and_notify(&state).await;
        assert_eq!(rx.recv().await.unwrap(), ReloadMessage::Reload);
        assert_eq!(state.health.build_report().status, BuildStatus::Success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_build_reports_error() {
        let state = state_with_command(Some("false"));
        let mut rx = state.reload_tx.subscribe();
        rebuild_and_notify(&state).await;
        match rx.recv().await.unwrap() {
            ReloadMessage::BuildError { message } => assert!(message.contains("'false' exited")),
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(!state.health.is_ready());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_quoted_arguments_stay_together() {
        assert!(run_build("sh -c 'exit 0'").await.is_ok());
        assert!(run_build(r#"sh -c "test '/my app/' = '/my app/'""#).await.is_ok());
        assert!(run_build("sh -c 'exit 3'").await.unwrap_err().contains("exited"));
    }

    #[tokio::test]
    async fn test_unbalanced_quotes_are_a_build_error() {
        let err = run_build("trunk build --public-url '/my app/").await.unwrap_err();
        assert!(err.contains("invalid build command"));
        assert!(run_build("   ").await.unwrap_err().contains("empty build command"));
    }

    #[tokio::test]
    async fn test_unknown_program_is_a_build_error() {
        let result = run_build("devserver-no-such-program --flag").await;
        assert!(result.unwrap_err().contains("failed to start"));
    }
}
