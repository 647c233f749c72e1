use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="page page--not-found">
            <h1>"Page not found"</h1>
            <p>"The page you are looking for does not exist or was removed."</p>
            <a href="/" class="button button--primary">"Back to home"</a>
        </div>
    }
}
