use crate::shared::api_utils::entity_url;
use crate::shared::http::{safe_fetch_json, use_http_client, HttpRequest};
use contracts::domain::run::Run;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

#[component]
pub fn RunPage() -> impl IntoView {
    let params = use_params_map();
    let run_id = move || params.read().get("id").unwrap_or_default();
    let client = StoredValue::new_local(use_http_client());

    let run = LocalResource::new(move || {
        let client = client.get_value();
        let id = run_id();
        async move { safe_fetch_json::<Run>(&client, HttpRequest::get(entity_url("runs", &id))).await }
    });

    view! {
        <div class="page page--run">
            {move || match run.get() {
                None => view! { <p class="loading">"Loading..."</p> }.into_any(),
                Some(result) => match result.into_result() {
                    Ok(run) => {
                        let status_class = if run.status.is_finished() {
                            "badge badge--finished"
                        } else {
                            "badge badge--active"
                        };
                        view! {
                            <div class="page__header">
                                <h1>"Run " {run.id.clone()}</h1>
                                <span class=status_class>{run.status.label()}</span>
                            </div>
                            <dl class="details">
                                <dt>"Actor"</dt>
                                <dd><a href=format!("/actor/{}", run.actor_id)>{run.actor_id.clone()}</a></dd>
                                <dt>"Started"</dt>
                                <dd>{run.started_at.clone().unwrap_or_else(|| "-".to_string())}</dd>
                                <dt>"Finished"</dt>
                                <dd>{run.finished_at.clone().unwrap_or_else(|| "-".to_string())}</dd>
                            </dl>
                        }
                        .into_any()
                    }
                    Err(e) => view! { <div class="error-message">{e}</div> }.into_any(),
                },
            }}
        </div>
    }
}
