use std::sync::Arc;

use chardex_store::StateStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Storage key for the comment list.
pub const COMMENTS_KEY: &str = "comments";

/// A free-text note attached to a character.
///
/// `character_id` is a plain reference, not an enforced foreign key:
/// comments outlive favorites and fetched pages alike, and nothing
/// cascade-deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub character_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only-per-character comment collection, persisted on every
/// mutation like the favorites registry.
pub struct CommentsLedger {
    store: Arc<StateStore>,
    comments: Vec<Comment>,
}

impl CommentsLedger {
    /// Load the persisted comments, or start empty.
    pub fn load(store: Arc<StateStore>) -> Self {
        let comments: Vec<Comment> = store.load(COMMENTS_KEY).unwrap_or_default();
        debug!("Loaded {} comment(s)", comments.len());
        Self { store, comments }
    }

    /// Attach a comment to a character.
    ///
    /// Whitespace-only text is rejected and the ledger stays untouched;
    /// otherwise the trimmed text is stored under a fresh uuid (two adds
    /// in the same millisecond still get distinct ids).
    pub fn add(&mut self, text: &str, character_id: &str) -> Option<Comment> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            character_id: character_id.to_string(),
            text: trimmed.to_string(),
            created_at: Utc::now(),
        };

        self.comments.push(comment.clone());
        self.persist();
        Some(comment)
    }

    /// Delete a comment by id. No-op when absent.
    pub fn remove(&mut self, id: &str) {
        let before = self.comments.len();
        self.comments.retain(|comment| comment.id != id);
        if self.comments.len() != before {
            self.persist();
        }
    }

    /// Comments for one character, oldest first. Recomputed per call -
    /// this is a snapshot, not a live view.
    pub fn for_character(&self, character_id: &str) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|comment| comment.character_id == character_id)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    fn persist(&self) {
        self.store.save(COMMENTS_KEY, &self.comments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_ledger() -> CommentsLedger {
        CommentsLedger::load(Arc::new(StateStore::open_in_memory().unwrap()))
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let mut ledger = fresh_ledger();

        assert!(ledger.add("", "1").is_none());
        assert!(ledger.add("   \t  ", "1").is_none());
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut ledger = fresh_ledger();

        let comment = ledger.add("  hi  ", "1").unwrap();
        assert_eq!(comment.text, "hi");
        assert_eq!(ledger.for_character("1")[0].text, "hi");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ledger = fresh_ledger();

        // Same text, same character, added back to back - ids still differ
        let a = ledger.add("wubba lubba dub dub", "1").unwrap();
        let b = ledger.add("wubba lubba dub dub", "1").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_for_character_keeps_insertion_order() {
        let mut ledger = fresh_ledger();

        ledger.add("first", "1");
        ledger.add("not this one", "2");
        ledger.add("second", "1");

        let comments = ledger.for_character("1");
        let texts: Vec<&str> = comments
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut ledger = fresh_ledger();

        let comment = ledger.add("delete me", "1").unwrap();
        ledger.add("keep me", "1");

        ledger.remove(&comment.id);

        let comments = ledger.for_character("1");
        let texts: Vec<&str> = comments
            .iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["keep me"]);

        // Removing an unknown id is a no-op
        ledger.remove("nope");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");

        let id = {
            let store = Arc::new(StateStore::open(&path).unwrap());
            let mut ledger = CommentsLedger::load(store);
            ledger.add("persistent thought", "1").unwrap().id
        };

        let store = Arc::new(StateStore::open(&path).unwrap());
        let ledger = CommentsLedger::load(store);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.all()[0].id, id);
        assert_eq!(ledger.all()[0].text, "persistent thought");
    }
}
