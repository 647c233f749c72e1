use serde::{Deserialize, Serialize};

/// Route the browser is sent to when a dynamic page hits a 404.
pub const NOT_FOUND_ROUTE: &str = "/not-found";

/// Parameterised route, e.g. `/actor/:id`.
///
/// `pattern` is a regular expression matched against the whole path,
/// `params` names its capture groups in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicRoute {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub params: Vec<String>,
}

impl DynamicRoute {
    pub fn new(name: &str, pattern: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Route classification table used by the 404 redirect.
///
/// A path is eligible for redirect only when it matches one of
/// `dynamic_routes` and is not listed in `static_routes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub static_routes: Vec<String>,
    #[serde(default)]
    pub dynamic_routes: Vec<DynamicRoute>,
}

impl RouteTable {
    /// Routes of this application.
    pub fn app_default() -> Self {
        Self {
            static_routes: [
                "/",
                "/actors",
                "/actor/new",
                "/about",
                NOT_FOUND_ROUTE,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            dynamic_routes: vec![
                DynamicRoute::new("actor", r"^/actor/([^/]+)$", &["id"]),
                DynamicRoute::new("run", r"^/run/([^/]+)$", &["id"]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "static_routes": ["/", "/about"],
            "dynamic_routes": [{"name": "actor", "pattern": "^/actor/([^/]+)$", "params": ["id"]}]
        }"#;
        let table: RouteTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.static_routes, vec!["/", "/about"]);
        assert_eq!(table.dynamic_routes[0].params, vec!["id"]);
    }

    #[test]
    fn test_params_are_optional() {
        let json = r#"{"dynamic_routes": [{"name": "x", "pattern": "^/x/[^/]+$"}]}"#;
        let table: RouteTable = serde_json::from_str(json).unwrap();
        assert!(table.static_routes.is_empty());
        assert!(table.dynamic_routes[0].params.is_empty());
    }

    #[test]
    fn test_default_table_lists_not_found() {
        let table = RouteTable::app_default();
        assert!(table.static_routes.iter().any(|r| r == NOT_FOUND_ROUTE));
        assert_eq!(table.dynamic_routes.len(), 2);
    }
}
