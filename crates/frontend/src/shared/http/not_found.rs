use super::client::{HttpRequest, HttpResponse};
use super::middleware::ResponseMiddleware;
use super::route_classifier::RouteClassifier;
use contracts::shared::routing::NOT_FOUND_ROUTE;
use std::rc::Rc;

/// Sends the user to the "not found" view when an entity page gets a 404.
///
/// The path is read when the response arrives, not when the request was
/// made. The 404 response is still handed to the caller afterwards.
pub struct NotFoundRedirect {
    classifier: Rc<RouteClassifier>,
    current_path: Rc<dyn Fn() -> String>,
    navigate: Rc<dyn Fn(&str)>,
}

impl NotFoundRedirect {
    pub fn new(
        classifier: Rc<RouteClassifier>,
        current_path: impl Fn() -> String + 'static,
        navigate: impl Fn(&str) + 'static,
    ) -> Self {
        Self {
            classifier,
            current_path: Rc::new(current_path),
            navigate: Rc::new(navigate),
        }
    }

    /// Reads the path from `window.location`.
    pub fn browser(classifier: Rc<RouteClassifier>, navigate: impl Fn(&str) + 'static) -> Self {
        Self::new(classifier, browser_pathname, navigate)
    }
}

fn browser_pathname() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

impl ResponseMiddleware for NotFoundRedirect {
    fn name(&self) -> &str {
        "not-found-redirect"
    }

    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        if response.status != 404 {
            return;
        }
        let path = (self.current_path)();
        if self.classifier.should_redirect(&path) {
            log::info!(
                "{} returned 404 on '{}', redirecting to {}",
                request.url,
                path,
                NOT_FOUND_ROUTE
            );
            (self.navigate)(NOT_FOUND_ROUTE);
        }
    }
}
