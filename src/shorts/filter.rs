//! Derivation of the visible feed from the committed keyword selection.

use std::collections::HashMap;

use super::item::{Catalog, FeedItem};
use super::keywords::KeywordSet;

/// Catalog items passing the current filter, in catalog order.
///
/// Holds indices into the shared catalog, so rebuilding it never copies
/// item data.
#[derive(Debug, Clone)]
pub struct VisibleFeed {
    catalog: Catalog,
    indices: Vec<usize>,
}

impl VisibleFeed {
    /// All items when `committed` is empty, otherwise every item sharing at
    /// least one keyword with it.
    pub fn derive(catalog: &Catalog, committed: &KeywordSet) -> Self {
        let indices = if committed.is_empty() {
            (0..catalog.len()).collect()
        } else {
            catalog
                .iter()
                .enumerate()
                .filter(|(_, item)| item.matches_any(committed))
                .map(|(i, _)| i)
                .collect()
        };
        Self {
            catalog: Catalog::clone(catalog),
            indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FeedItem> {
        self.indices.get(position).map(|&i| &self.catalog[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedItem> {
        self.indices.iter().map(|&i| &self.catalog[i])
    }
}

/// Number of catalog items tagged with each keyword.
pub fn keyword_histogram(catalog: &[FeedItem]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in catalog {
        for keyword in &item.keywords {
            *counts.entry(keyword.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorts::item::{builtin_catalog, clip};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn set(keywords: &[&str]) -> KeywordSet {
        keywords.iter().map(|k| k.to_string()).collect()
    }

    fn ids(feed: &VisibleFeed) -> Vec<&str> {
        feed.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_empty_selection_shows_everything() {
        let catalog = builtin_catalog();
        let feed = VisibleFeed::derive(&catalog, &KeywordSet::new());
        assert_eq!(feed.len(), catalog.len());
    }

    #[test]
    fn test_single_keyword_scenario() {
        let catalog: Catalog = vec![
            clip("a", "A", "", "x", 0, 0, 0, "0:10", &["강아지", "영화"]),
            clip("b", "B", "", "x", 0, 0, 0, "0:10", &["고양이"]),
        ]
        .into();
        let feed = VisibleFeed::derive(&catalog, &set(&["강아지"]));
        assert_eq!(ids(&feed), vec!["a"]);
    }

    #[test]
    fn test_filter_preserves_catalog_order() {
        let catalog = builtin_catalog();
        let feed = VisibleFeed::derive(&catalog, &set(&["영화", "강아지"]));
        assert_eq!(ids(&feed), vec!["s1", "s6", "s10", "s14", "s16"]);
    }

    #[test]
    fn test_unknown_keyword_gives_empty_feed() {
        let catalog = builtin_catalog();
        let feed = VisibleFeed::derive(&catalog, &set(&["여행"]));
        assert!(feed.is_empty());
        assert!(feed.get(0).is_none());
    }

    #[test]
    fn test_keyword_histogram() {
        let catalog = builtin_catalog();
        let counts = keyword_histogram(&catalog);
        assert_eq!(counts.get("강아지"), Some(&3));
        assert_eq!(counts.get("영화"), Some(&3));
        assert_eq!(counts.get("EDM"), Some(&1));
        assert_eq!(counts.get("여행"), None);
    }

    fn arb_catalog() -> impl Strategy<Value = Vec<Vec<String>>> {
        let kw = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
        prop::collection::vec(prop::collection::vec(kw, 0..3), 0..12)
    }

    proptest! {
        #[test]
        fn prop_filter_matches_definition(
            tags in arb_catalog(),
            selected in prop::collection::btree_set(
                prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(String::from), 0..3),
        ) {
            let catalog: Catalog = tags
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    let refs: Vec<&str> = t.iter().map(String::as_str).collect();
                    clip(&format!("i{}", i), "t", "", "x", 0, 0, 0, "0:01", &refs)
                })
                .collect::<Vec<_>>()
                .into();
            let feed = VisibleFeed::derive(&catalog, &selected);

            if selected.is_empty() {
                prop_assert_eq!(feed.len(), catalog.len());
            } else {
                let visible: Vec<&str> = ids(&feed);
                for item in catalog.iter() {
                    let intersects = item.keywords.iter().any(|k| selected.contains(k));
                    prop_assert_eq!(visible.contains(&item.id.as_str()), intersects);
                }
            }
            // Order is a subsequence of the catalog
            let positions: Vec<usize> = feed
                .iter()
                .map(|it| catalog.iter().position(|c| c.id == it.id).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
