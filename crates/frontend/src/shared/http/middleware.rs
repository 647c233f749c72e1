use super::client::{HttpRequest, HttpResponse};
use std::rc::Rc;

/// Observer of completed responses.
///
/// Middleware never changes or swallows a response: whatever it decides to
/// do (log, navigate), the caller still receives the response unchanged.
pub trait ResponseMiddleware {
    fn name(&self) -> &str;
    fn on_response(&self, request: &HttpRequest, response: &HttpResponse);
}

/// Ordered list of middleware, run in insertion order.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Rc<dyn ResponseMiddleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, layer: impl ResponseMiddleware + 'static) -> Self {
        self.layers.push(Rc::new(layer));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }

    pub fn run(&self, request: &HttpRequest, response: &HttpResponse) {
        for layer in &self.layers {
            layer.on_response(request, response);
        }
    }
}

/// Logs every non-2xx response to the browser console.
pub struct LoggingMiddleware;

impl ResponseMiddleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_response(&self, request: &HttpRequest, response: &HttpResponse) {
        if !response.ok() {
            log::warn!(
                "{} {} -> {} {}",
                request.method.as_str(),
                request.url,
                response.status,
                response.status_text
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ResponseMiddleware for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn on_response(&self, _request: &HttpRequest, response: &HttpResponse) {
            self.log
                .borrow_mut()
                .push(format!("{}:{}", self.label, response.status));
        }
    }

    #[test]
    fn test_chain_runs_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let chain = MiddlewareChain::new()
            .with(Recorder {
                label: "first",
                log: log.clone(),
            })
            .with(LoggingMiddleware)
            .with(Recorder {
                label: "second",
                log: log.clone(),
            });

        assert_eq!(chain.names(), vec!["first", "logging", "second"]);
        chain.run(&HttpRequest::get("/x"), &HttpResponse::new(404, Vec::new()));
        assert_eq!(*log.borrow(), vec!["first:404", "second:404"]);
    }
}
