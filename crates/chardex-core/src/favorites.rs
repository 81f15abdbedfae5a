use std::sync::Arc;

use chardex_store::StateStore;
use tracing::debug;

use crate::models::Character;

/// Storage key for the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// User-pinned characters, kept across sessions.
///
/// Each entry is the full snapshot taken at favoriting time, so a
/// favorite renders without a live fetch even when the current page
/// doesn't contain it. Every mutation persists immediately.
///
/// Membership checks are a linear scan - fine for the handful of
/// favorites a person actually keeps, revisit if that assumption breaks.
pub struct FavoritesRegistry {
    store: Arc<StateStore>,
    entries: Vec<Character>,
}

impl FavoritesRegistry {
    /// Load the persisted favorites, or start empty.
    pub fn load(store: Arc<StateStore>) -> Self {
        let entries: Vec<Character> = store.load(FAVORITES_KEY).unwrap_or_default();
        debug!("Loaded {} favorite(s)", entries.len());
        Self { store, entries }
    }

    /// Pin a character. Already pinned? Nothing happens.
    pub fn add(&mut self, character: &Character) {
        if self.is_favorite(&character.id) {
            return;
        }
        self.entries.push(character.clone());
        self.persist();
    }

    /// Unpin by id. No-op when absent.
    pub fn remove(&mut self, id: &str) {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() != before {
            self.persist();
        }
    }

    /// Flip the pin: exactly one of add/remove runs per call.
    pub fn toggle(&mut self, character: &Character) {
        if self.is_favorite(&character.id) {
            self.remove(&character.id);
        } else {
            self.add(character);
        }
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// The pinned snapshots, in the order they were added.
    pub fn all(&self) -> &[Character] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        self.store.save(FAVORITES_KEY, &self.entries);
    }
}
