use crate::layout::Shell;
use crate::routes::routes::AppRoutes;
use crate::shared::http::client::{GlooTransport, HttpClient};
use crate::shared::http::middleware::{LoggingMiddleware, MiddlewareChain};
use crate::shared::http::not_found::NotFoundRedirect;
use crate::shared::http::provide_http_client;
use crate::shared::http::route_classifier::RouteClassifier;
use contracts::shared::routing::RouteTable;
use leptos::prelude::*;
use leptos_router::components::Router;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;
use std::rc::Rc;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <AppShell />
        </Router>
    }
}

/// Lives inside the router so the HTTP client can navigate.
#[component]
fn AppShell() -> impl IntoView {
    let navigate = use_navigate();
    provide_http_client(build_http_client(&RouteTable::app_default(), move |to| {
        navigate(to, NavigateOptions::default())
    }));

    view! {
        <Shell>
            <AppRoutes />
        </Shell>
    }
}

/// One client per application instance: logging first, then the 404 redirect.
pub fn build_http_client(table: &RouteTable, navigate: impl Fn(&str) + 'static) -> HttpClient {
    let mut chain = MiddlewareChain::new().with(LoggingMiddleware);
    match RouteClassifier::new(table) {
        Ok(classifier) => {
            chain = chain.with(NotFoundRedirect::browser(Rc::new(classifier), navigate));
        }
        Err(e) => log::error!("404 redirect disabled: {}", e),
    }
    HttpClient::new(Rc::new(GlooTransport), chain)
}
