use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub total_runs: u64,
}

impl Actor {
    /// Title when set, otherwise the technical name.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Body of `POST /api/actors`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActorRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_actor_deserializes() {
        let actor: Actor = serde_json::from_str(r#"{"id":"a1","name":"web-scraper"}"#).unwrap();
        assert_eq!(actor.total_runs, 0);
        assert_eq!(actor.display_name(), "web-scraper");
    }
}
