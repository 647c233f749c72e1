use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="page page--home">
            <h1>"Actor Console"</h1>
            <p>"Browse your actors and inspect their runs."</p>
            <div class="page__actions">
                <a href="/actors" class="button button--primary">"Open actors"</a>
                <a href="/actor/new" class="button button--secondary">"Create actor"</a>
            </div>
        </div>
    }
}
