//! Navigation bar that gains a "scrolled" style once the page moves.

/// Class added to the nav element while scrolled.
pub const SCROLLED_CLASS: &str = "nav--scrolled";
/// Scroll offset, in CSS pixels, past which the bar counts as scrolled.
pub const SCROLL_THRESHOLD: f64 = 40.0;

/// Tracks the nav bar's scrolled state across scroll events.
#[derive(Debug, Clone)]
pub struct NavScroll {
    threshold: f64,
    scrolled: bool,
}

impl Default for NavScroll {
    fn default() -> Self {
        Self::new(SCROLL_THRESHOLD)
    }
}

impl NavScroll {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scrolled: false,
        }
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Feeds a scroll position; returns the new state only when it changed,
    /// so the class list is touched once per transition.
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let scrolled = scroll_y > self.threshold;
        if scrolled == self.scrolled {
            return None;
        }
        self.scrolled = scrolled;
        Some(scrolled)
    }
}
