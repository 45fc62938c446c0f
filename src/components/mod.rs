//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the mirrored conversation from a Leptos context signal and
//! route every user action through the shared controller.

pub mod chat_panel;
pub mod launcher;
pub mod message_list;
