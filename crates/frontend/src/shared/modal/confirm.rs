use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

/// Visual flavour of a [`ConfirmModal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalVariant {
    #[default]
    Danger,
    Warning,
    Info,
    Success,
}

impl ModalVariant {
    pub fn icon_name(&self) -> &'static str {
        match self {
            ModalVariant::Danger => "alert-triangle",
            ModalVariant::Warning => "alert-circle",
            ModalVariant::Info => "info",
            ModalVariant::Success => "check-circle",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            ModalVariant::Danger => "confirm-modal__icon confirm-modal__icon--danger",
            ModalVariant::Warning => "confirm-modal__icon confirm-modal__icon--warning",
            ModalVariant::Info => "confirm-modal__icon confirm-modal__icon--info",
            ModalVariant::Success => "confirm-modal__icon confirm-modal__icon--success",
        }
    }

    pub fn confirm_button_class(&self) -> &'static str {
        match self {
            ModalVariant::Danger => "button button--danger",
            ModalVariant::Warning => "button button--warning",
            ModalVariant::Info => "button button--primary",
            ModalVariant::Success => "button button--success",
        }
    }
}

/// Escape-to-cancel, suppressed while an action is in flight.
pub struct EscapeHandler<C, L> {
    on_cancel: C,
    is_loading: L,
}

impl<C, L> EscapeHandler<C, L>
where
    C: Fn(),
    L: Fn() -> bool,
{
    pub fn new(on_cancel: C, is_loading: L) -> Self {
        Self {
            on_cancel,
            is_loading,
        }
    }

    /// Returns `true` when the key was consumed.
    pub fn handle_key(&self, key: &str) -> bool {
        if key != "Escape" || (self.is_loading)() {
            return false;
        }
        (self.on_cancel)();
        true
    }
}

/// Keeps the page from scrolling behind an open dialog.
/// The previous `overflow` value comes back on drop.
pub struct ScrollLock {
    body: web_sys::HtmlElement,
    previous: String,
}

impl ScrollLock {
    pub fn acquire() -> Option<Self> {
        let body = web_sys::window()?.document()?.body()?;
        let style = body.style();
        let previous = style.get_property_value("overflow").unwrap_or_default();
        let _ = style.set_property("overflow", "hidden");
        Some(Self { body, previous })
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let style = self.body.style();
        if self.previous.is_empty() {
            let _ = style.remove_property("overflow");
        } else {
            let _ = style.set_property("overflow", &self.previous);
        }
    }
}

/// Confirmation dialog.
///
/// Renders nothing while `is_open` is false. While open it locks page
/// scroll and cancels on Escape; both are released when it closes.
#[component]
pub fn ConfirmModal(
    #[prop(into)] is_open: Signal<bool>,
    /// Cancel button, overlay click and Escape
    on_close: Callback<()>,
    on_confirm: Callback<()>,
    #[prop(into)] title: String,
    #[prop(into, optional)] confirm_text: Option<String>,
    #[prop(into, optional)] cancel_text: Option<String>,
    #[prop(optional)] variant: ModalVariant,
    #[prop(into, default = Signal::stored(false))] is_loading: Signal<bool>,
    /// Message body
    children: ChildrenFn,
) -> impl IntoView {
    let confirm_text = confirm_text.unwrap_or_else(|| "Confirm".to_string());
    let cancel_text = cancel_text.unwrap_or_else(|| "Cancel".to_string());

    move || {
        is_open.get().then(|| {
            view! {
                <ConfirmDialog
                    title=title.clone()
                    message=children.clone()
                    confirm_text=confirm_text.clone()
                    cancel_text=cancel_text.clone()
                    variant=variant
                    is_loading=is_loading
                    on_close=on_close
                    on_confirm=on_confirm
                />
            }
        })
    }
}

#[component]
fn ConfirmDialog(
    title: String,
    message: ChildrenFn,
    confirm_text: String,
    cancel_text: String,
    variant: ModalVariant,
    is_loading: Signal<bool>,
    on_close: Callback<()>,
    on_confirm: Callback<()>,
) -> impl IntoView {
    let escape = EscapeHandler::new(move || on_close.run(()), move || is_loading.get_untracked());
    let listener = window_event_listener(ev::keydown, move |event| {
        if escape.handle_key(&event.key()) {
            event.prevent_default();
        }
    });
    let scroll_lock = StoredValue::new_local(ScrollLock::acquire());

    on_cleanup(move || {
        listener.remove();
        scroll_lock.try_update_value(|lock| drop(lock.take()));
    });

    let handle_overlay_click = move |_| {
        if !is_loading.get_untracked() {
            on_close.run(());
        }
    };

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    view! {
        <div class="modal-overlay" on:click=handle_overlay_click>
            <div class="modal confirm-modal" role="dialog" aria-modal="true" on:click=stop_propagation>
                <div class="confirm-modal__header">
                    <span class=variant.icon_class()>{icon(variant.icon_name())}</span>
                    <h2 class="modal-title">{title}</h2>
                </div>
                <div class="modal-body">
                    {message()}
                </div>
                <div class="confirm-modal__actions">
                    <button
                        class="button button--secondary"
                        disabled=move || is_loading.get()
                        on:click=move |_| on_close.run(())
                    >
                        {cancel_text}
                    </button>
                    <button
                        class=variant.confirm_button_class()
                        disabled=move || is_loading.get()
                        on:click=move |_| on_confirm.run(())
                    >
                        {move || if is_loading.get() { "Processing...".to_string() } else { confirm_text.clone() }}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_escape_cancels_once_when_idle() {
        let calls = Cell::new(0);
        let handler = EscapeHandler::new(|| calls.set(calls.get() + 1), || false);
        assert!(handler.handle_key("Escape"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_escape_ignored_while_loading() {
        let calls = Cell::new(0);
        let handler = EscapeHandler::new(|| calls.set(calls.get() + 1), || true);
        assert!(!handler.handle_key("Escape"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_other_keys_ignored() {
        let calls = Cell::new(0);
        let handler = EscapeHandler::new(|| calls.set(calls.get() + 1), || false);
        assert!(!handler.handle_key("Enter"));
        assert!(!handler.handle_key("Esc"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_variant_styling() {
        assert_eq!(ModalVariant::default(), ModalVariant::Danger);
        assert_eq!(ModalVariant::Warning.icon_name(), "alert-circle");
        assert_eq!(ModalVariant::Info.confirm_button_class(), "button button--primary");
        assert!(ModalVariant::Success.icon_class().ends_with("--success"));
    }
}
