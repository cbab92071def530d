//! Text rendering for message bodies and status labels.

mod markdown;
mod styles;
mod width;
mod wrap;

pub use markdown::{render_literal, render_markdown};
pub use width::truncate_to_width;
pub use wrap::wrap_lines;
