//! TopHeader component - application top navigation bar.

use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn TopHeader() -> impl IntoView {
    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <A href="/">
                    <span class="top-header__title">"Actor Console"</span>
                </A>
            </div>
            <nav class="top-header__nav">
                <A href="/actors">"Actors"</A>
                <A href="/actor/new">"New actor"</A>
                <A href="/about">"About"</A>
            </nav>
        </div>
    }
}
