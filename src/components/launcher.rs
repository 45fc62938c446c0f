//! Floating button that opens the chat panel.

use leptos::prelude::*;

use crate::controller::ConversationController;

/// Shown only while the panel is closed.
#[component]
pub fn Launcher() -> impl IntoView {
    let controller = expect_context::<StoredValue<ConversationController, LocalStorage>>();
    let on_click = move |_| controller.get_value().toggle_panel();

    view! {
        <button class="chat-widget__launcher" title="Open chat" on:click=on_click>
            "💬"
        </button>
    }
}
