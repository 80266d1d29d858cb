//! Keyword catalog: the fixed built-in keywords plus up to five of the user's own.
//!
//! Custom keywords are persisted under [`CUSTOM_KEYWORDS_KEY`] after every
//! change. Invalid additions are rejected with a [`KeywordRejected`] reason and
//! leave the catalog untouched.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::storage::{load_json, save_json, KeyValueStore, StoreError, CUSTOM_KEYWORDS_KEY};
use crate::util::sanitize_keyword;

/// A set of keywords (selection, draft). Ordered so persisted arrays are stable.
pub type KeywordSet = BTreeSet<String>;

/// Built-in keywords, in display order.
pub const DEFAULT_KEYWORDS: [&str; 12] = [
    "강아지",
    "고양이",
    "자기개발",
    "마음의 위로",
    "이별",
    "사랑",
    "가족",
    "공포",
    "영화",
    "발라드 노래",
    "힙합",
    "EDM",
];

/// Maximum number of user-defined keywords.
pub const MAX_CUSTOM_KEYWORDS: usize = 5;

/// Why an `add_custom` call changed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeywordRejected {
    #[error("Keyword is empty")]
    Empty,

    #[error("Keyword '{0}' already exists")]
    Duplicate(String),

    #[error("Custom keyword limit reached ({max})")]
    CapacityExceeded { max: usize },
}

#[derive(Debug, Error)]
pub enum KeywordError {
    #[error(transparent)]
    Rejected(#[from] KeywordRejected),

    #[error("Failed to save custom keywords: {0}")]
    Storage(#[from] StoreError),
}

/// Built-in and user-defined keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCatalog {
    custom: Vec<String>,
}

impl KeywordCatalog {
    /// Load custom keywords from the store.
    ///
    /// Stored entries are kept verbatim so they keep matching the persisted
    /// selection. A list that breaks the invariants (blank, built-in or
    /// duplicate entries, more than [`MAX_CUSTOM_KEYWORDS`]) is repaired in
    /// memory; the store is rewritten on the next change.
    pub async fn load<S: KeyValueStore>(store: &S) -> Self {
        let stored: Vec<String> = load_json(store, CUSTOM_KEYWORDS_KEY).await;
        let stored_len = stored.len();

        let mut seen = HashSet::new();
        let custom: Vec<String> = stored
            .into_iter()
            .filter(|k| !k.trim().is_empty() && !is_default(k) && seen.insert(k.clone()))
            .take(MAX_CUSTOM_KEYWORDS)
            .collect();

        if custom.len() != stored_len {
            tracing::warn!(
                stored = stored_len,
                kept = custom.len(),
                "Dropped invalid entries from persisted custom keywords"
            );
        }
        Self { custom }
    }

    pub fn default_keywords(&self) -> &'static [&'static str] {
        &DEFAULT_KEYWORDS
    }

    pub fn custom_keywords(&self) -> &[String] {
        &self.custom
    }

    /// Default keywords followed by custom ones.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        DEFAULT_KEYWORDS
            .iter()
            .copied()
            .chain(self.custom.iter().map(String::as_str))
    }

    pub fn is_custom(&self, keyword: &str) -> bool {
        self.custom.iter().any(|k| k == keyword)
    }

    pub fn is_full(&self) -> bool {
        self.custom.len() >= MAX_CUSTOM_KEYWORDS
    }

    /// Check whether `raw` could be added, returning the normalized keyword.
    pub fn validate(&self, raw: &str) -> Result<String, KeywordRejected> {
        let keyword = sanitize_keyword(raw);
        if keyword.is_empty() {
            return Err(KeywordRejected::Empty);
        }
        if is_default(&keyword) || self.is_custom(&keyword) {
            return Err(KeywordRejected::Duplicate(keyword));
        }
        if self.is_full() {
            return Err(KeywordRejected::CapacityExceeded {
                max: MAX_CUSTOM_KEYWORDS,
            });
        }
        Ok(keyword)
    }

    /// Append a custom keyword and persist the list.
    ///
    /// The store is written before the in-memory list changes, so a failed
    /// write leaves the catalog as it was. Returns the normalized keyword.
    pub async fn add_custom<S: KeyValueStore>(
        &mut self,
        store: &S,
        raw: &str,
    ) -> Result<String, KeywordError> {
        let keyword = self.validate(raw)?;

        let mut updated = self.custom.clone();
        updated.push(keyword.clone());
        save_json(store, CUSTOM_KEYWORDS_KEY, &updated).await?;
        self.custom = updated;

        tracing::debug!(keyword = %keyword, count = self.custom.len(), "Added custom keyword");
        Ok(keyword)
    }

    /// Remove a custom keyword and persist the list.
    ///
    /// Returns `Ok(false)` without touching the store if `keyword` is not a
    /// custom keyword. Built-in keywords cannot be removed.
    pub async fn remove_custom<S: KeyValueStore>(
        &mut self,
        store: &S,
        keyword: &str,
    ) -> Result<bool, StoreError> {
        if !self.is_custom(keyword) {
            return Ok(false);
        }
        let updated: Vec<String> = self
            .custom
            .iter()
            .filter(|k| k.as_str() != keyword)
            .cloned()
            .collect();
        save_json(store, CUSTOM_KEYWORDS_KEY, &updated).await?;
        self.custom = updated;

        tracing::debug!(keyword = %keyword, count = self.custom.len(), "Removed custom keyword");
        Ok(true)
    }
}

fn is_default(keyword: &str) -> bool {
    DEFAULT_KEYWORDS.contains(&keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    async fn catalog_with(store: &MemoryStore, keywords: &[&str]) -> KeywordCatalog {
        let mut catalog = KeywordCatalog::load(store).await;
        for k in keywords {
            catalog.add_custom(store, k).await.unwrap();
        }
        catalog
    }

    #[tokio::test]
    async fn test_defaults_fixed() {
        let catalog = KeywordCatalog::load(&MemoryStore::new()).await;
        assert_eq!(catalog.default_keywords().len(), 12);
        assert_eq!(catalog.default_keywords()[0], "강아지");
        assert_eq!(catalog.default_keywords()[11], "EDM");
        assert!(catalog.custom_keywords().is_empty());
    }

    #[tokio::test]
    async fn test_add_custom_persists_in_order() {
        let store = MemoryStore::new();
        let catalog = catalog_with(&store, &["여행", "캠핑"]).await;

        assert_eq!(catalog.custom_keywords(), &["여행".to_string(), "캠핑".to_string()]);
        assert_eq!(
            store.raw(CUSTOM_KEYWORDS_KEY).as_deref(),
            Some(r#"["여행","캠핑"]"#)
        );
    }

    #[tokio::test]
    async fn test_add_custom_trims() {
        let store = MemoryStore::new();
        let mut catalog = KeywordCatalog::load(&store).await;
        let added = catalog.add_custom(&store, "   요리  ").await.unwrap();
        assert_eq!(added, "요리");
        assert!(catalog.is_custom("요리"));
    }

    #[tokio::test]
    async fn test_add_empty_rejected() {
        let store = MemoryStore::new();
        let mut catalog = KeywordCatalog::load(&store).await;
        let err = catalog.add_custom(&store, "   ").await.unwrap_err();
        assert!(matches!(err, KeywordError::Rejected(KeywordRejected::Empty)));
        assert_eq!(store.raw(CUSTOM_KEYWORDS_KEY), None);
    }

    #[tokio::test]
    async fn test_add_duplicate_rejected() {
        let store = MemoryStore::new();
        let mut catalog = catalog_with(&store, &["여행"]).await;

        let err = catalog.add_custom(&store, " 여행").await.unwrap_err();
        assert!(matches!(
            err,
            KeywordError::Rejected(KeywordRejected::Duplicate(ref k)) if k == "여행"
        ));
        // A built-in keyword counts as already present
        let err = catalog.add_custom(&store, "힙합").await.unwrap_err();
        assert!(matches!(err, KeywordError::Rejected(KeywordRejected::Duplicate(_))));
        assert_eq!(catalog.custom_keywords().len(), 1);
    }

    #[tokio::test]
    async fn test_sixth_keyword_rejected() {
        let store = MemoryStore::new();
        let mut catalog = catalog_with(&store, &["a", "b", "c", "d", "e"]).await;
        assert!(catalog.is_full());

        let err = catalog.add_custom(&store, "신규").await.unwrap_err();
        assert!(matches!(
            err,
            KeywordError::Rejected(KeywordRejected::CapacityExceeded { max: 5 })
        ));
        assert_eq!(catalog.custom_keywords().len(), 5);
        assert!(!store.raw(CUSTOM_KEYWORDS_KEY).unwrap().contains("신규"));
    }

    #[tokio::test]
    async fn test_add_storage_failure_leaves_catalog() {
        let store = MemoryStore::new();
        let mut catalog = catalog_with(&store, &["여행"]).await;
        store.set_fail_writes(true);

        let err = catalog.add_custom(&store, "캠핑").await.unwrap_err();
        assert!(matches!(err, KeywordError::Storage(_)));
        assert_eq!(catalog.custom_keywords(), &["여행".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_custom() {
        let store = MemoryStore::new();
        let mut catalog = catalog_with(&store, &["여행", "캠핑", "요리"]).await;

        assert!(catalog.remove_custom(&store, "캠핑").await.unwrap());
        assert_eq!(catalog.custom_keywords(), &["여행".to_string(), "요리".to_string()]);
        assert_eq!(
            store.raw(CUSTOM_KEYWORDS_KEY).as_deref(),
            Some(r#"["여행","요리"]"#)
        );
    }

    #[tokio::test]
    async fn test_remove_absent_or_default_is_noop() {
        let store = MemoryStore::new();
        let mut catalog = catalog_with(&store, &["여행"]).await;
        store.set_fail_writes(true); // proves nothing is written

        assert!(!catalog.remove_custom(&store, "없음").await.unwrap());
        assert!(!catalog.remove_custom(&store, "강아지").await.unwrap());
        assert_eq!(catalog.custom_keywords().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_frees_capacity() {
        let store = MemoryStore::new();
        let mut catalog = catalog_with(&store, &["a", "b", "c", "d", "e"]).await;
        catalog.remove_custom(&store, "c").await.unwrap();
        catalog.add_custom(&store, "f").await.unwrap();
        assert_eq!(
            catalog.custom_keywords(),
            &["a", "b", "d", "e", "f"].map(String::from)
        );
    }

    #[tokio::test]
    async fn test_load_survives_reload() {
        let store = MemoryStore::new();
        catalog_with(&store, &["여행", "캠핑"]).await;

        let reloaded = KeywordCatalog::load(&store).await;
        assert_eq!(reloaded.custom_keywords(), &["여행".to_string(), "캠핑".to_string()]);
    }

    #[tokio::test]
    async fn test_load_repairs_invalid_list() {
        let store = MemoryStore::new().with_raw(
            CUSTOM_KEYWORDS_KEY,
            r#"["a", "a", " ", "강아지", "b", "c", "d", "e", "f"]"#,
        );
        let catalog = KeywordCatalog::load(&store).await;
        assert_eq!(catalog.custom_keywords(), &["a", "b", "c", "d", "e"].map(String::from));
    }

    #[tokio::test]
    async fn test_load_keeps_stored_spelling() {
        let store = MemoryStore::new().with_raw(CUSTOM_KEYWORDS_KEY, r#"["힙합  댄스"]"#);
        let mut catalog = KeywordCatalog::load(&store).await;
        assert_eq!(catalog.custom_keywords(), &["힙합  댄스".to_string()]);

        assert!(catalog.remove_custom(&store, "힙합  댄스").await.unwrap());
        assert!(catalog.custom_keywords().is_empty());
        assert_eq!(store.raw(CUSTOM_KEYWORDS_KEY).as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_load_malformed_is_empty() {
        let store = MemoryStore::new().with_raw(CUSTOM_KEYWORDS_KEY, "not json");
        let catalog = KeywordCatalog::load(&store).await;
        assert!(catalog.custom_keywords().is_empty());
    }

    #[tokio::test]
    async fn test_all_lists_defaults_then_custom() {
        let store = MemoryStore::new();
        let catalog = catalog_with(&store, &["여행"]).await;
        let all: Vec<&str> = catalog.all().collect();
        assert_eq!(all.len(), 13);
        assert_eq!(all[0], "강아지");
        assert_eq!(all[12], "여행");
    }

    proptest! {
        #[test]
        fn prop_add_custom_never_exceeds_capacity_or_duplicates(
            inputs in proptest::collection::vec("[a-c ]{0,3}", 0..20)
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = MemoryStore::new();
                let mut catalog = KeywordCatalog::load(&store).await;
                for raw in &inputs {
                    let before = catalog.custom_keywords().len();
                    match catalog.add_custom(&store, raw).await {
                        Ok(_) => prop_assert_eq!(catalog.custom_keywords().len(), before + 1),
                        Err(_) => prop_assert_eq!(catalog.custom_keywords().len(), before),
                    }
                    prop_assert!(catalog.custom_keywords().len() <= MAX_CUSTOM_KEYWORDS);
                    let unique: HashSet<&String> = catalog.custom_keywords().iter().collect();
                    prop_assert_eq!(unique.len(), catalog.custom_keywords().len());
                }
                Ok(())
            })?;
        }
    }
}
