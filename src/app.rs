//! Root widget component and browser entry point.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ChatWidget` owns the controller for its mounted lifetime. Controller
//! events are mirrored into a `RwSignal<ConversationState>` that components
//! read through context; actions go back through the stored controller.

use leptos::prelude::*;

use crate::components::chat_panel::ChatPanel;
use crate::components::launcher::Launcher;
use crate::config::WidgetConfig;
use crate::controller::ConversationController;
use crate::net::default_transport;
use crate::state::conversation::ConversationState;

/// Id of the optional host-page element carrying deploy-time JSON config.
pub const CONFIG_ELEMENT_ID: &str = "chat-widget-config";

/// Embeddable chat widget.
#[component]
pub fn ChatWidget(config: WidgetConfig) -> impl IntoView {
    let controller = ConversationController::new(&config, default_transport(&config));

    let conversation = RwSignal::new(controller.snapshot());
    let mirror = controller.clone();
    controller.subscribe(move |_event| conversation.set(mirror.snapshot()));

    // The mirror observer holds a controller clone; teardown clears it.
    let controller = StoredValue::new_local(controller);
    provide_context(conversation);
    provide_context(controller);

    on_cleanup(move || {
        if let Some(controller) = controller.try_get_value() {
            controller.teardown();
        }
    });

    let WidgetConfig { title, greeting, placeholder, .. } = config;

    view! {
        <div class="chat-widget">
            <Show
                when=move || conversation.with(ConversationState::is_open)
                fallback=|| view! { <Launcher/> }
            >
                <ChatPanel title=title.clone() greeting=greeting.clone() placeholder=placeholder.clone()/>
            </Show>
        </div>
    }
}

/// Browser entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn mount() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("chat widget not mounted: {e}");
            return;
        }
    };
    log::info!("chat widget: posting to {}", config.endpoint);

    leptos::mount::mount_to_body(move || view! { <ChatWidget config=config/> });
}

/// Host-page JSON wins over values baked in at build time.
#[cfg(feature = "csr")]
fn load_config() -> Result<WidgetConfig, crate::config::ConfigError> {
    let inline = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());
    match inline {
        Some(json) => WidgetConfig::from_json(&json),
        None => WidgetConfig::from_build_env(),
    }
}
