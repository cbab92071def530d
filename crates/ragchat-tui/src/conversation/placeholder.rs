//! Placeholder text for the input area.

/// Placeholder shown in an empty input, based on whether sending is
/// possible and whether the input has focus.
#[must_use]
pub fn input_placeholder(send_enabled: bool, focused: bool) -> &'static str {
    match (send_enabled, focused) {
        (false, _) => "Waiting for a reply...",
        (true, false) => "Press Enter to type, q to quit",
        (true, true) => "Ask a question about your documents...",
    }
}
