//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`StatusBar`] - Top bar with server and upload status
//! - [`FooterHints`] - Bottom keybinding hints and notifications

mod footer_hints;
mod status_bar;

pub use footer_hints::{hints_for_state, FooterHints, KeyHint};
pub use status_bar::StatusBar;
