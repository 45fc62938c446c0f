//! Embeddable chat widget.
//!
//! A floating launcher opens a panel that shows a greeting, an append-only
//! message log, and an input row. Each submission is posted to an assistant
//! endpoint; replies may carry quick-reply buttons whose values are sent
//! back as `__CLICKED__:<value>` without echoing a user bubble.
//!
//! ARCHITECTURE
//! ============
//! - `net`: fail-soft transport and wire types.
//! - `state`: conversation transitions and reply ordering.
//! - `controller`: the send pipeline and change observers.
//! - `components`, `app`: Leptos presentation and the browser entry point.
//! - `config`: typed widget configuration.

pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod net;
pub mod state;
