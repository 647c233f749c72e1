//! Decides whether a 404 on the current page should send the user to the
//! "not found" view.
//!
//! Only pages that show a single entity by id (`/actor/:id`, `/run/:id`)
//! redirect: a 404 there means the entity is gone. Fixed pages never
//! redirect, even when a dynamic pattern would also match them.

use contracts::shared::routing::RouteTable;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

struct CompiledRoute {
    name: String,
    regex: Regex,
    params: Vec<String>,
}

/// Dynamic route that matched a path, with its captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

pub struct RouteClassifier {
    static_routes: HashSet<String>,
    dynamic_routes: Vec<CompiledRoute>,
}

impl RouteClassifier {
    pub fn new(table: &RouteTable) -> Result<Self, String> {
        let dynamic_routes = table
            .dynamic_routes
            .iter()
            .map(|route| {
                Regex::new(&route.pattern)
                    .map(|regex| CompiledRoute {
                        name: route.name.clone(),
                        regex,
                        params: route.params.clone(),
                    })
                    .map_err(|e| format!("Invalid pattern for route '{}': {}", route.name, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            static_routes: table.static_routes.iter().cloned().collect(),
            dynamic_routes,
        })
    }

    pub fn is_static(&self, path: &str) -> bool {
        self.static_routes.contains(path)
    }

    /// First dynamic route matching `path`, in table order.
    pub fn match_dynamic(&self, path: &str) -> Option<RouteMatch> {
        self.dynamic_routes.iter().find_map(|route| {
            let captures = route.regex.captures(path)?;
            let params = route
                .params
                .iter()
                .enumerate()
                .filter_map(|(i, param)| {
                    captures
                        .get(i + 1)
                        .map(|m| (param.clone(), m.as_str().to_string()))
                })
                .collect();
            Some(RouteMatch {
                name: route.name.clone(),
                params,
            })
        })
    }

    pub fn should_redirect(&self, path: &str) -> bool {
        !self.is_static(path) && self.match_dynamic(path).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::routing::DynamicRoute;

    fn classifier() -> RouteClassifier {
        RouteClassifier::new(&RouteTable::app_default()).unwrap()
    }

    #[test]
    fn test_static_routes_never_redirect() {
        let c = classifier();
        for path in &RouteTable::app_default().static_routes {
            assert!(!c.should_redirect(path), "static route {} redirected", path);
        }
        // also matches ^/actor/([^/]+)$
        assert!(c.match_dynamic("/actor/new").is_some());
        assert!(!c.should_redirect("/actor/new"));
    }

    #[test]
    fn test_dynamic_routes_redirect() {
        let c = classifier();
        assert!(c.should_redirect("/actor/abc123"));
        assert!(c.should_redirect("/run/xyz"));
    }

    #[test]
    fn test_other_paths_do_not_redirect() {
        let c = classifier();
        assert!(!c.should_redirect("/about"));
        assert!(!c.should_redirect("/actor/abc/extra"));
        assert!(!c.should_redirect("/actor/"));
        assert!(!c.should_redirect("/unknown/page"));
    }

    #[test]
    fn test_match_captures_params() {
        let m = classifier().match_dynamic("/run/r-42").unwrap();
        assert_eq!(m.name, "run");
        assert_eq!(m.params.get("id").map(String::as_str), Some("r-42"));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let table = RouteTable {
            static_routes: vec![],
            dynamic_routes: vec![DynamicRoute::new("broken", "^/x/(", &[])],
        };
        let err = RouteClassifier::new(&table).err().unwrap();
        assert!(err.contains("broken"));
    }
}
