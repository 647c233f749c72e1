use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Ready,
    Running,
    Succeeded,
    Failed,
    Aborted,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Ready => "Ready",
            RunStatus::Running => "Running",
            RunStatus::Succeeded => "Succeeded",
            RunStatus::Failed => "Failed",
            RunStatus::Aborted => "Aborted",
            RunStatus::Unknown => "Unknown",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Aborted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub actor_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_tolerated() {
        let run: Run =
            serde_json::from_str(r#"{"id":"r1","actor_id":"a1","status":"TIMING-OUT"}"#).unwrap();
        assert_eq!(run.status, RunStatus::Unknown);
        assert!(!run.status.is_finished());
    }

    #[test]
    fn test_status_names() {
        let status: RunStatus = serde_json::from_str(r#""SUCCEEDED""#).unwrap();
        assert_eq!(status, RunStatus::Succeeded);
        assert!(status.is_finished());
    }
}
