//! Scrolling message list with quick-reply buttons.
//!
//! SYSTEM CONTEXT
//! ==============
//! Renders the mirrored conversation log. What to draw is decided by the
//! pure [`bubbles`] function so the rules can be tested without a DOM.

#[cfg(test)]
#[path = "message_list_test.rs"]
mod message_list_test;

use leptos::prelude::*;

use crate::controller::ConversationController;
use crate::net::types::ButtonSpec;
use crate::state::conversation::{ConversationState, Sender};

/// One rendered bubble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bubble {
    pub sender: Sender,
    pub text: String,
    pub buttons: Vec<ButtonSpec>,
    /// The synthetic greeting shown while the log is empty.
    pub greeting: bool,
}

/// Bubbles to draw for `state`, in render order.
pub fn bubbles(state: &ConversationState, greeting: &str) -> Vec<Bubble> {
    if state.shows_greeting() {
        return vec![Bubble { sender: Sender::Bot, text: greeting.to_owned(), buttons: Vec::new(), greeting: true }];
    }
    state
        .messages()
        .iter()
        .map(|msg| Bubble {
            sender: msg.sender,
            text: msg.text.clone(),
            buttons: msg.quick_replies().to_vec(),
            greeting: false,
        })
        .collect()
}

pub fn bubble_class(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "chat-widget__bubble chat-widget__bubble--user",
        Sender::Bot => "chat-widget__bubble chat-widget__bubble--bot",
    }
}

/// Message history for the open panel.
#[component]
pub fn MessageList(greeting: String) -> impl IntoView {
    let conversation = expect_context::<RwSignal<ConversationState>>();
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    // Draft edits also touch the signal; only log growth should scroll.
    let log_len = Memo::new(move |_| conversation.with(|state| state.messages().len()));

    Effect::new(move || {
        let _ = log_len.get();

        #[cfg(feature = "csr")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    view! {
        <div class="chat-widget__messages" node_ref=messages_ref>
            {move || {
                conversation
                    .with(|state| bubbles(state, &greeting))
                    .into_iter()
                    .map(|bubble| view! { <MessageBubble bubble=bubble/> })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}

#[component]
fn MessageBubble(bubble: Bubble) -> impl IntoView {
    let controller = expect_context::<StoredValue<ConversationController, LocalStorage>>();
    let is_user = bubble.sender == Sender::User;
    let buttons = (!bubble.buttons.is_empty()).then(|| {
        bubble
            .buttons
            .into_iter()
            .map(|button| {
                let value = button.value;
                let on_click = move |_| {
                    let pending = controller.get_value().activate_button(&value);
                    leptos::task::spawn_local(async move {
                        pending.await;
                    });
                };
                view! {
                    <button class="chat-widget__quick-reply" on:click=on_click>
                        {button.text}
                    </button>
                }
            })
            .collect::<Vec<_>>()
    });

    view! {
        <div class="chat-widget__row" class:chat-widget__row--user=is_user>
            <div class="chat-widget__avatar">{if is_user { "🧑" } else { "🤖" }}</div>
            <div class=bubble_class(bubble.sender) class:chat-widget__bubble--greeting=bubble.greeting>
                <p>{bubble.text}</p>
                {buttons.map(|buttons| view! { <div class="chat-widget__quick-replies">{buttons}</div> })}
            </div>
        </div>
    }
}
