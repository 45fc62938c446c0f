//! Open chat panel: header, message list, and input row.

#[cfg(test)]
#[path = "chat_panel_test.rs"]
mod chat_panel_test;

use leptos::prelude::*;

use crate::components::message_list::MessageList;
use crate::controller::ConversationController;
use crate::state::conversation::ConversationState;

/// Panel shown while the widget is open.
#[component]
pub fn ChatPanel(title: String, greeting: String, placeholder: String) -> impl IntoView {
    let conversation = expect_context::<RwSignal<ConversationState>>();
    let controller = expect_context::<StoredValue<ConversationController, LocalStorage>>();

    let do_send = move || {
        let pending = controller.get_value().submit_draft();
        leptos::task::spawn_local(async move {
            pending.await;
        });
    };

    let on_click = move |_| do_send();

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if submits_on_key(&ev.key(), ev.is_composing()) {
            ev.prevent_default();
            do_send();
        }
    };

    let on_close = move |_| controller.get_value().close_panel();

    view! {
        <div class="chat-widget__panel">
            <div class="chat-widget__header">
                <span class="chat-widget__title">{title}</span>
                <button class="chat-widget__close" title="Close" on:click=on_close>
                    "✕"
                </button>
            </div>

            <MessageList greeting=greeting/>

            <div class="chat-widget__input-row">
                <input
                    class="chat-widget__input"
                    type="text"
                    placeholder=placeholder
                    prop:value=move || conversation.with(|state| state.draft_input().to_owned())
                    on:input=move |ev| controller.get_value().edit_draft(event_target_value(&ev))
                    on:keydown=on_keydown
                />
                <button class="chat-widget__send" on:click=on_click>
                    "Send"
                </button>
            </div>
        </div>
    }
}

/// Enter sends, except while an IME is still composing the text.
fn submits_on_key(key: &str, is_composing: bool) -> bool {
    key == "Enter" && !is_composing
}
