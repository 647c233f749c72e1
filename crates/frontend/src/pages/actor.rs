use crate::shared::api_utils::{api_url, entity_url};
use crate::shared::http::{safe_fetch, safe_fetch_json, use_http_client, HttpRequest};
use crate::shared::modal::{ConfirmModal, ModalVariant};
use contracts::domain::actor::{Actor, CreateActorRequest};
use contracts::shared::fetch_result::FetchResult;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};
use leptos_router::NavigateOptions;

#[component]
pub fn ActorsPage() -> impl IntoView {
    let client = StoredValue::new_local(use_http_client());

    let actors = LocalResource::new(move || {
        let client = client.get_value();
        async move { safe_fetch_json::<Vec<Actor>>(&client, HttpRequest::get(api_url("/api/actors"))).await }
    });

    view! {
        <div class="page page--actors">
            <div class="page__header">
                <h1>"Actors"</h1>
                <a href="/actor/new" class="button button--primary">"New actor"</a>
            </div>
            {move || match actors.get() {
                None => view! { <p class="loading">"Loading..."</p> }.into_any(),
                Some(result) => match result.into_result() {
                    Ok(list) if list.is_empty() => {
                        view! { <p class="empty">"No actors yet."</p> }.into_any()
                    }
                    Ok(list) => view! {
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Runs"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {list
                                    .into_iter()
                                    .map(|actor| {
                                        let href = format!("/actor/{}", actor.id);
                                        view! {
                                            <tr>
                                                <td><a href=href>{actor.display_name().to_string()}</a></td>
                                                <td>{actor.total_runs}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                    Err(e) => view! { <div class="error-message">{e}</div> }.into_any(),
                },
            }}
        </div>
    }
}

#[component]
pub fn ActorPage() -> impl IntoView {
    let params = use_params_map();
    let actor_id = move || params.read().get("id").unwrap_or_default();

    let client = StoredValue::new_local(use_http_client());
    let navigate = StoredValue::new_local(use_navigate());

    let actor = LocalResource::new(move || {
        let client = client.get_value();
        let id = actor_id();
        async move { safe_fetch_json::<Actor>(&client, HttpRequest::get(entity_url("actors", &id))).await }
    });

    let (confirm_open, set_confirm_open) = signal(false);
    let (deleting, set_deleting) = signal(false);
    let (delete_error, set_delete_error) = signal(None::<String>);

    let on_close = Callback::new(move |_| set_confirm_open.set(false));
    let on_confirm = Callback::new(move |_| {
        let client = client.get_value();
        let id = actor_id();
        set_deleting.set(true);
        set_delete_error.set(None);

        spawn_local(async move {
            // DELETE may answer 204 without a body, so only the status matters
            let outcome = safe_fetch(&client, HttpRequest::delete(entity_url("actors", &id))).await;
            set_deleting.set(false);
            match outcome {
                Ok(response) if response.ok() => {
                    set_confirm_open.set(false);
                    navigate.with_value(|nav| nav("/actors", NavigateOptions::default()));
                }
                Ok(response) => {
                    set_delete_error.set(Some(format!("Delete failed: {}", response.status)));
                    set_confirm_open.set(false);
                }
                Err(e) => {
                    set_delete_error.set(Some(format!("Failed to send request: {}", e)));
                    set_confirm_open.set(false);
                }
            }
        });
    });

    view! {
        <div class="page page--actor">
            {move || match actor.get() {
                None => view! { <p class="loading">"Loading..."</p> }.into_any(),
                Some(result) => match result.into_result() {
                    Ok(actor) => view! {
                        <div class="page__header">
                            <h1>{actor.display_name().to_string()}</h1>
                            <button
                                class="button button--danger"
                                on:click=move |_| set_confirm_open.set(true)
                            >
                                {crate::shared::icons::icon("trash")}
                                "Delete"
                            </button>
                        </div>
                        <dl class="details">
                            <dt>"Name"</dt>
                            <dd>{actor.name.clone()}</dd>
                            <dt>"Runs"</dt>
                            <dd>{actor.total_runs}</dd>
                            <dt>"Created"</dt>
                            <dd>{actor.created_at.clone().unwrap_or_else(|| "-".to_string())}</dd>
                        </dl>
                        <p class="description">{actor.description.clone().unwrap_or_default()}</p>
                    }
                    .into_any(),
                    Err(e) => view! { <div class="error-message">{e}</div> }.into_any(),
                },
            }}
            <Show when=move || delete_error.get().is_some()>
                <div class="error-message">{move || delete_error.get().unwrap_or_default()}</div>
            </Show>
            <ConfirmModal
                is_open=confirm_open
                on_close=on_close
                on_confirm=on_confirm
                title="Delete actor"
                confirm_text="Delete"
                variant=ModalVariant::Danger
                is_loading=deleting
            >
                <p>"This permanently deletes the actor and all of its runs."</p>
            </ConfirmModal>
        </div>
    }
}

#[component]
pub fn NewActorPage() -> impl IntoView {
    let client = StoredValue::new_local(use_http_client());
    let navigate = StoredValue::new_local(use_navigate());

    let (name, set_name) = signal(String::new());
    let (title, set_title) = signal(String::new());
    let (error_message, set_error_message) = signal(None::<String>);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let name_val = name.get().trim().to_string();
        if name_val.is_empty() {
            set_error_message.set(Some("Name is required".to_string()));
            return;
        }
        let title_val = Some(title.get().trim().to_string()).filter(|t| !t.is_empty());
        let request = match HttpRequest::post(api_url("/api/actors")).json(&CreateActorRequest {
            name: name_val,
            title: title_val,
        }) {
            Ok(request) => request,
            Err(e) => {
                set_error_message.set(Some(e));
                return;
            }
        };

        set_is_loading.set(true);
        set_error_message.set(None);
        let client = client.get_value();

        spawn_local(async move {
            let result: FetchResult<Actor> = safe_fetch_json(&client, request).await;
            set_is_loading.set(false);
            match result.into_result() {
                Ok(actor) => {
                    let path = format!("/actor/{}", actor.id);
                    navigate.with_value(|nav| nav(&path, NavigateOptions::default()));
                }
                Err(e) => set_error_message.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page page--new-actor">
            <h1>"New actor"</h1>
            <Show when=move || error_message.get().is_some()>
                <div class="error-message">{move || error_message.get().unwrap_or_default()}</div>
            </Show>
            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="actor-name">"Name"</label>
                    <input
                        id="actor-name"
                        type="text"
                        prop:value=name
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="actor-title">"Title"</label>
                    <input
                        id="actor-title"
                        type="text"
                        prop:value=title
                        on:input=move |ev| set_title.set(event_target_value(&ev))
                    />
                </div>
                <button type="submit" class="button button--primary" disabled=move || is_loading.get()>
                    {move || if is_loading.get() { "Creating..." } else { "Create" }}
                </button>
            </form>
        </div>
    }
}
