use chardex_store::StateStore;
use serde::{Deserialize, Serialize};

use crate::models::{FilterCriteria, SortField, SortOrder};

/// Storage key for the preference bundle.
pub const PREFERENCES_KEY: &str = "preferences";

/// The UI state that survives a restart: active filters, sort, the raw
/// search text and the pagination cursor. Persisted as one bundle so a
/// session picks up exactly where the last one stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub filters: FilterCriteria,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub search_term: String,
    #[serde(default = "default_page")]
    pub current_page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            filters: FilterCriteria::default(),
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            search_term: String::new(),
            current_page: 1,
        }
    }
}

impl Preferences {
    /// Load the persisted bundle, or start from defaults.
    pub fn load(store: &StateStore) -> Self {
        store.load(PREFERENCES_KEY).unwrap_or_default()
    }

    pub fn save(&self, store: &StateStore) {
        store.save(PREFERENCES_KEY, self);
    }
}
