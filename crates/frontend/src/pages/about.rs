use leptos::prelude::*;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="page page--about">
            <h1>"About"</h1>
            <p>
                "Single-page console for actors and runs. Data is loaded from the API at "
                <code>{crate::shared::api_utils::api_base()}</code>
                "."
            </p>
        </div>
    }
}
