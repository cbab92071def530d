//! Theme components for the TUI.
//!
//! Provides [`Theme`], the color palette (Catppuccin Mocha/Latte or high contrast).

mod colors;

pub use colors::{Theme, ThemeName};
