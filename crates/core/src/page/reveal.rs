//! Sections that fade in the first time they scroll into view.

use std::collections::BTreeSet;

/// Class that marks an element as revealed.
pub const VISIBLE_CLASS: &str = "reveal--visible";
/// Selector for elements that participate in the reveal.
pub const REVEAL_SELECTOR: &str = ".reveal";

/// Intersection settings for reveal elements.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Root margin in CSS syntax; the negative bottom margin reveals slightly
    /// after an element crosses the viewport edge.
    pub root_margin: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            root_margin: "0px 0px -40px 0px".to_string(),
        }
    }
}

/// What the host should do with an element after an intersection report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealAction {
    /// Add [`VISIBLE_CLASS`] and stop observing the element.
    RevealAndUnobserve,
    Ignore,
}

/// One-shot reveal bookkeeping, keyed by element index.
///
/// Revealing is permanent: an element scrolled back out of view keeps its
/// class.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    total: usize,
    revealed: BTreeSet<usize>,
}

impl RevealTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            revealed: BTreeSet::new(),
        }
    }

    /// Handles an intersection report for element `index`.
    pub fn observe(&mut self, index: usize, is_intersecting: bool) -> RevealAction {
        if !is_intersecting || index >= self.total || !self.revealed.insert(index) {
            return RevealAction::Ignore;
        }
        RevealAction::RevealAndUnobserve
    }

    /// Reveals everything at once, for hosts without an intersection
    /// observer. Returns the indices that were still hidden.
    pub fn reveal_all(&mut self) -> Vec<usize> {
        let hidden: Vec<_> = (0..self.total)
            .filter(|i| !self.revealed.contains(i))
            .collect();
        self.revealed.extend(hidden.iter().copied());
        hidden
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    pub fn is_complete(&self) -> bool {
        self.revealed.len() == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_page_settings() {
        let o = RevealOptions::default();
        assert!((o.threshold - 0.15).abs() < f64::EPSILON);
        assert_eq!(o.root_margin, "0px 0px -40px 0px");
    }

    #[test]
    fn first_intersection_reveals_and_unobserves() {
        let mut t = RevealTracker::new(3);
        assert_eq!(t.observe(1, true), RevealAction::RevealAndUnobserve);
        assert!(t.is_revealed(1));
    }

    #[test]
    fn non_intersecting_reports_are_ignored() {
        let mut t = RevealTracker::new(3);
        assert_eq!(t.observe(0, false), RevealAction::Ignore);
        assert!(!t.is_revealed(0));
    }

    #[test]
    fn reveal_is_one_shot() {
        let mut t = RevealTracker::new(1);
        t.observe(0, true);
        assert_eq!(t.observe(0, true), RevealAction::Ignore);
        t.observe(0, false);
        assert!(t.is_revealed(0));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut t = RevealTracker::new(2);
        assert_eq!(t.observe(5, true), RevealAction::Ignore);
    }

    #[test]
    fn reveal_all_returns_only_hidden_elements() {
        let mut t = RevealTracker::new(4);
        t.observe(2, true);
        assert_eq!(t.reveal_all(), vec![0, 1, 3]);
        assert!(t.is_complete());
        assert!(t.reveal_all().is_empty());
    }
}
