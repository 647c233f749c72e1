use crate::pages::about::AboutPage;
use crate::pages::actor::{ActorPage, ActorsPage, NewActorPage};
use crate::pages::home::HomePage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::run::RunPage;
use leptos::prelude::*;
use leptos_router::components::{Route, Routes};
use leptos_router::path;

#[component]
pub fn AppRoutes() -> impl IntoView {
    view! {
        <Routes fallback=|| view! { <NotFoundPage /> }>
            <Route path=path!("/") view=HomePage />
            <Route path=path!("/actors") view=ActorsPage />
            <Route path=path!("/actor/new") view=NewActorPage />
            <Route path=path!("/actor/:id") view=ActorPage />
            <Route path=path!("/run/:id") view=RunPage />
            <Route path=path!("/about") view=AboutPage />
            <Route path=path!("/not-found") view=NotFoundPage />
        </Routes>
    }
}
