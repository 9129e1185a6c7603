//! Transcript scroll position with follow mode.
//!
//! The pane renders with `follow` on by default, which pins the view to the
//! bottom. Scrolling up turns follow off; scrolling back to the bottom, or
//! any change to the message list, turns it on again.

/// Lines scrolled per arrow key or mouse wheel tick.
pub const SCROLL_STEP: usize = 3;

/// Scroll state of the transcript, updated by the pane on every render.
#[derive(Debug, Clone)]
pub struct TranscriptScroll {
    /// First visible line when not following.
    scroll_offset: usize,
    /// Whether the view is pinned to the bottom.
    follow: bool,
    /// Largest valid offset at the last render.
    max_offset: usize,
    /// Visible rows at the last render.
    viewport: usize,
}

impl Default for TranscriptScroll {
    fn default() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
            max_offset: 0,
            viewport: 0,
        }
    }
}

impl TranscriptScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Pin the view to the newest line.
    pub fn pin_to_bottom(&mut self) {
        self.follow = true;
        self.scroll_offset = self.max_offset;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        if self.follow {
            self.scroll_offset = self.max_offset;
        }
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        if self.follow {
            return;
        }
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_offset);
        if self.scroll_offset == self.max_offset {
            self.follow = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page_size());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page_size());
    }

    fn page_size(&self) -> usize {
        self.viewport.saturating_sub(1).max(1)
    }

    /// Record the content and viewport heights and return the first line
    /// to draw.
    pub fn resolve(&mut self, content_height: usize, viewport: usize) -> usize {
        self.viewport = viewport;
        self.max_offset = content_height.saturating_sub(viewport);
        if self.follow {
            self.scroll_offset = self.max_offset;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_offset);
        }
        self.scroll_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_by_default() {
        let mut scroll = TranscriptScroll::new();
        assert_eq!(scroll.resolve(100, 10), 90);
        assert_eq!(scroll.resolve(120, 10), 110);
    }

    #[test]
    fn test_short_content_starts_at_top() {
        let mut scroll = TranscriptScroll::new();
        assert_eq!(scroll.resolve(4, 10), 0);
    }

    #[test]
    fn test_scroll_up_stops_following() {
        let mut scroll = TranscriptScroll::new();
        scroll.resolve(100, 10);
        scroll.scroll_up(SCROLL_STEP);

        assert!(!scroll.is_following());
        assert_eq!(scroll.resolve(100, 10), 87);
        // New content does not move a reader who scrolled back
        assert_eq!(scroll.resolve(130, 10), 87);
    }

    #[test]
    fn test_scroll_down_to_bottom_resumes_follow() {
        let mut scroll = TranscriptScroll::new();
        scroll.resolve(100, 10);
        scroll.page_up();
        assert_eq!(scroll.resolve(100, 10), 81);

        scroll.page_down();
        assert!(scroll.is_following());
    }

    #[test]
    fn test_pin_to_bottom() {
        let mut scroll = TranscriptScroll::new();
        scroll.resolve(100, 10);
        scroll.scroll_up(50);
        scroll.pin_to_bottom();
        assert!(scroll.is_following());
        assert_eq!(scroll.resolve(140, 10), 130);
    }

    #[test]
    fn test_scroll_up_clamps_at_top() {
        let mut scroll = TranscriptScroll::new();
        scroll.resolve(20, 10);
        scroll.scroll_up(500);
        assert_eq!(scroll.resolve(20, 10), 0);
    }
}
