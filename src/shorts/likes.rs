//! Session-local like marks.
//!
//! Likes are never persisted and never change the catalog's base counts.

use std::collections::HashSet;

use super::item::FeedItem;

#[derive(Debug, Clone, Default)]
pub struct LikeLedger {
    liked: HashSet<String>,
}

impl LikeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the mark for `id`. Returns whether it is now liked.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.liked.remove(id) {
            false
        } else {
            self.liked.insert(id.to_string());
            true
        }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.liked.is_empty()
    }

    /// Base count plus one while the user has liked the item.
    pub fn display_count(&self, item: &FeedItem) -> u64 {
        item.likes.saturating_add(u64::from(self.is_liked(&item.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorts::item::clip;

    #[test]
    fn test_toggle_twice_restores() {
        let item = clip("s1", "t", "", "a", 100, 0, 0, "0:10", &[]);
        let mut likes = LikeLedger::new();

        assert!(likes.toggle("s1"));
        assert_eq!(likes.display_count(&item), 101);
        assert!(!likes.toggle("s1"));
        assert_eq!(likes.display_count(&item), 100);
        assert!(!likes.is_liked("s1"));
    }

    #[test]
    fn test_marks_are_per_item() {
        let mut likes = LikeLedger::new();
        likes.toggle("a");
        assert!(likes.is_liked("a"));
        assert!(!likes.is_liked("b"));
    }

    #[test]
    fn test_display_count_saturates_at_max() {
        let item = clip("x", "t", "", "a", u64::MAX, 0, 0, "0:10", &[]);
        let mut likes = LikeLedger::new();
        likes.toggle("x");
        assert_eq!(likes.display_count(&item), u64::MAX);
    }
}
