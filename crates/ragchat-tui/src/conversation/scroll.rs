//! Scroll position for the message list.
//!
//! Offsets count lines up from the bottom of the content.

/// Lines scrolled per mouse wheel tick.
pub const WHEEL_STEP: usize = 3;

/// Scroll state for the conversation pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    /// Lines between the bottom of the view and the end of the content.
    offset: usize,
    /// Whether the view sticks to the newest message.
    follow: bool,
    /// Rows the message list had at the last render.
    viewport: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
            viewport: 0,
        }
    }
}

impl ScrollState {
    /// Create a state that follows new messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Current offset from the bottom.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scroll toward older messages. Disables follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        if amount == 0 {
            return;
        }
        self.follow = false;
        self.offset = self.offset.saturating_add(amount);
    }

    /// Scroll toward newer messages. Reaching the bottom re-enables follow.
    pub fn scroll_down(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
        if self.offset == 0 {
            self.follow = true;
        }
    }

    /// One page, as tall as the last rendered viewport.
    pub fn page(&self) -> usize {
        self.viewport.saturating_sub(1).max(1)
    }

    /// Jump to the newest message and follow.
    pub fn follow_bottom(&mut self) {
        self.offset = 0;
        self.follow = true;
    }

    /// Fit the state to `total` content lines shown in `height` rows and
    /// return the index of the first visible line.
    pub fn resolve(&mut self, total: usize, height: usize) -> usize {
        self.viewport = height;
        let max = total.saturating_sub(height);
        if self.follow {
            self.offset = 0;
        }
        self.offset = self.offset.min(max);
        max - self.offset
    }
}
