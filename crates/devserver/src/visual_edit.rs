//! Visual edit: change page text in the browser and have it written back to
//! the frontend sources.
//!
//! The injected client lets the user Alt+click an element and type the new
//! text. The server replaces the one occurrence of the old text under
//! `source_root`; the watcher then rebuilds and reloads the page.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jwalk::WalkDir;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Component, Path, PathBuf};

use crate::state::AppState;

pub const CLIENT_SCRIPT_PATH: &str = "/__visual-edit/client.js";
pub const EDIT_PATH: &str = "/__visual-edit/edit";

const EDITABLE_EXTENSIONS: &[&str] = &["rs", "html", "css"];

const CLIENT_SCRIPT: &str = r#"(function () {
  document.addEventListener("click", function (event) {
    if (!event.altKey) return;
    event.preventDefault();
    event.stopPropagation();
    var el = event.target;
    var oldText = (el.textContent || "").trim();
    if (!oldText) return;
    var newText = window.prompt("Replace text", oldText);
    if (newText === null || newText === oldText) return;
    fetch("/__visual-edit/edit", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ file: el.dataset.sourceFile || null, old_text: oldText, new_text: newText })
    })
      .then(function (r) { return r.json().then(function (body) { return { ok: r.ok, body: body }; }); })
      .then(function (res) {
        if (!res.ok) console.error("[visual-edit] " + res.body.error);
        else console.info("[visual-edit] updated " + res.body.file);
      })
      .catch(function (e) { console.error("[visual-edit] " + e); });
  }, true);
})();
"#;

#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    /// Relative to `source_root`; searched when absent
    #[serde(default)]
    pub file: Option<String>,
    pub old_text: String,
    pub new_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditResponse {
    pub file: String,
}

#[derive(Debug, thiserror::Error)]
pub enum VisualEditError {
    #[error("text to replace is empty")]
    EmptyText,
    #[error("path '{0}' is outside the source root")]
    OutsideRoot(String),
    #[error("file '{0}' not found")]
    FileNotFound(String),
    #[error("text not found in sources")]
    TextNotFound,
    #[error("text occurs {0} times, refine the selection")]
    Ambiguous(usize),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisualEditError {
    fn status(&self) -> StatusCode {
        match self {
            VisualEditError::EmptyText => StatusCode::BAD_REQUEST,
            VisualEditError::OutsideRoot(_) => StatusCode::FORBIDDEN,
            VisualEditError::FileNotFound(_) => StatusCode::NOT_FOUND,
            VisualEditError::TextNotFound | VisualEditError::Ambiguous(_) => StatusCode::CONFLICT,
            VisualEditError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VisualEditError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Joins `relative` onto `root`, refusing absolute paths, `..` and symlinks
/// that lead outside of `root`.
pub fn resolve_in_root(root: &Path, relative: &str) -> Result<PathBuf, VisualEditError> {
    let rel = Path::new(relative);
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(VisualEditError::OutsideRoot(relative.to_string()));
    }

    let path = root.join(rel);
    if !path.is_file() {
        return Err(VisualEditError::FileNotFound(relative.to_string()));
    }

    let canonical_root = root.canonicalize()?;
    let canonical = path.canonicalize()?;
    if !canonical.starts_with(&canonical_root) {
        return Err(VisualEditError::OutsideRoot(relative.to_string()));
    }
    Ok(canonical)
}

fn is_editable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EDITABLE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Editable files under `root`, canonicalized. Symlinks are not followed and
/// anything resolving outside of `root` is skipped.
fn editable_files(root: &Path) -> Result<Vec<PathBuf>, VisualEditError> {
    let canonical_root = root.canonicalize()?;
    let mut files = Vec::new();
    let walk = WalkDir::new(root)
        .follow_links(false)
        .skip_hidden(false)
        .sort(true);
    for entry in walk {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_editable(&path) {
            continue;
        }
        match path.canonicalize() {
            Ok(canonical) if canonical.starts_with(&canonical_root) => files.push(canonical),
            _ => tracing::warn!("Skipping {}: outside the source root", path.display()),
        }
    }
    Ok(files)
}

/// Replaces the single occurrence of `old_text`; returns the edited file.
pub fn apply_edit(source_root: &Path, request: &EditRequest) -> Result<PathBuf, VisualEditError> {
    if request.old_text.trim().is_empty() {
        return Err(VisualEditError::EmptyText);
    }

    let candidates = match request.file.as_deref().filter(|f| !f.is_empty()) {
        Some(file) => vec![resolve_in_root(source_root, file)?],
        None => editable_files(source_root)?,
    };

    let mut found: Option<(PathBuf, String)> = None;
    let mut occurrences = 0;
    for path in candidates {
        // non UTF-8 files cannot contain the text
        let Ok(contents) = std::fs::read_to_string(&path) else {
            continue;
        };
        let count = contents.matches(request.old_text.as_str()).count();
        if count > 0 {
            occurrences += count;
            found = Some((path, contents));
        }
    }

    match (occurrences, found) {
        (0, _) | (_, None) => Err(VisualEditError::TextNotFound),
        (1, Some((path, contents))) => {
            let updated = contents.replacen(request.old_text.as_str(), &request.new_text, 1);
            std::fs::write(&path, updated)?;
            Ok(path)
        }
        (n, _) => Err(VisualEditError::Ambiguous(n)),
    }
}

/// GET /__visual-edit/client.js
pub async fn client_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        CLIENT_SCRIPT,
    )
}

/// POST /__visual-edit/edit
pub async fn edit(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> Result<Json<EditResponse>, VisualEditError> {
    let root = state.config.source_root.clone();
    let path = tokio::task::spawn_blocking(move || apply_edit(&root, &request))
        .await
        .map_err(|e| VisualEditError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

    let shown = path
        .strip_prefix(state.config.source_root.canonicalize()?)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string());
    tracing::info!("Visual edit applied to {}", shown);
    Ok(Json(EditResponse { file: shown }))
}
