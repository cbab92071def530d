//! Conversation pane module.
//!
//! The conversation pane fills the middle of the screen:
//! - Message list (scrollable, follows new messages by default)
//! - Input area

mod lines;
mod placeholder;
mod scroll;
mod widget;

pub use lines::{conversation_lines, message_lines, LineOptions};
pub use placeholder::input_placeholder;
pub use scroll::{ScrollState, WHEEL_STEP};
pub use widget::ConversationPane;
