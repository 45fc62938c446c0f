//! Widget state modules.
//!
//! DESIGN
//! ======
//! `conversation` holds the synchronous transitions over the log, panel, and
//! draft; `sequencer` decides when resolved replies may join the log.

pub mod conversation;
pub mod sequencer;
