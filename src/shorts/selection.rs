//! Stage-then-commit editing of the keyword filter.
//!
//! `committed` is the filter the feed uses; it is an immutable snapshot that
//! only [`SelectionStaging::apply`] (and [`SelectionStaging::clear`]) replace.
//! `draft` exists only while the selection modal is open and is a private
//! copy, so cancelling can never leak an edit into the feed.

use std::sync::Arc;

use thiserror::Error;

use super::keywords::KeywordSet;
use crate::storage::{load_json, save_json, KeyValueStore, StoreError, SELECTED_KEYWORDS_KEY};

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Keyword selection is not being edited")]
    NotEditing,

    #[error("Failed to save keyword selection: {0}")]
    Storage(#[from] StoreError),
}

/// Committed filter plus the optional in-progress draft.
#[derive(Debug, Clone, Default)]
pub struct SelectionStaging {
    committed: Arc<KeywordSet>,
    draft: Option<KeywordSet>,
}

impl SelectionStaging {
    /// Load the committed selection from the store (absent/malformed → empty).
    pub async fn load<S: KeyValueStore>(store: &S) -> Self {
        let committed: KeywordSet = load_json(store, SELECTED_KEYWORDS_KEY).await;
        tracing::debug!(count = committed.len(), "Loaded committed keyword selection");
        Self {
            committed: Arc::new(committed),
            draft: None,
        }
    }

    /// Snapshot of the committed selection.
    pub fn committed(&self) -> &Arc<KeywordSet> {
        &self.committed
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// The draft, while editing.
    pub fn draft(&self) -> Option<&KeywordSet> {
        self.draft.as_ref()
    }

    /// Start editing with a copy of the committed selection.
    ///
    /// Opening while already editing keeps the current draft.
    pub fn open(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(KeywordSet::clone(&self.committed));
        }
    }

    /// Flip `keyword` in the draft. Returns whether it is now selected.
    pub fn toggle(&mut self, keyword: &str) -> Result<bool, SelectionError> {
        let draft = self.draft.as_mut().ok_or(SelectionError::NotEditing)?;
        if draft.remove(keyword) {
            Ok(false)
        } else {
            draft.insert(keyword.to_string());
            Ok(true)
        }
    }

    /// Empty the draft, staying in editing mode.
    pub fn reset(&mut self) -> Result<(), SelectionError> {
        let draft = self.draft.as_mut().ok_or(SelectionError::NotEditing)?;
        draft.clear();
        Ok(())
    }

    /// Discard the draft. The committed selection is untouched.
    pub fn cancel(&mut self) {
        if self.draft.take().is_some() {
            tracing::debug!("Discarded keyword draft");
        }
    }

    /// Drop `keyword` from the draft if editing. The committed selection is
    /// never modified here.
    pub fn remove_from_draft(&mut self, keyword: &str) -> bool {
        self.draft
            .as_mut()
            .is_some_and(|draft| draft.remove(keyword))
    }

    /// Persist the draft and make it the committed selection, closing the
    /// editor.
    ///
    /// On a storage failure the editor stays open with the draft intact and
    /// the committed selection is unchanged.
    pub async fn apply<S: KeyValueStore>(
        &mut self,
        store: &S,
    ) -> Result<Arc<KeywordSet>, SelectionError> {
        let draft = self.draft.take().ok_or(SelectionError::NotEditing)?;
        if let Err(e) = save_json(store, SELECTED_KEYWORDS_KEY, &draft).await {
            self.draft = Some(draft);
            return Err(e.into());
        }
        tracing::debug!(count = draft.len(), "Applied keyword selection");
        self.committed = Arc::new(draft);
        Ok(Arc::clone(&self.committed))
    }

    /// Clear the committed selection and persist the empty set.
    ///
    /// Recovery action for an empty feed. Any open draft is discarded.
    pub async fn clear<S: KeyValueStore>(&mut self, store: &S) -> Result<(), SelectionError> {
        save_json(store, SELECTED_KEYWORDS_KEY, &KeywordSet::new()).await?;
        self.committed = Arc::new(KeywordSet::new());
        self.draft = None;
        tracing::debug!("Cleared keyword selection");
        Ok(())
    }
}
