// The aggregation pipeline: remote page + local favorites -> derived view
use std::sync::Arc;

use chardex_store::StateStore;
use tracing::{debug, info};

use crate::{
    comments::{Comment, CommentsLedger},
    favorites::FavoritesRegistry,
    models::{Character, FavoriteScope, FilterCriteria, SortField, SortOrder},
    prefs::Preferences,
    source::CharacterSource,
    view, Error, Result,
};

/// The derived view actually shown to the user: filtered, sorted, and
/// split into a starred and a regular section.
#[derive(Debug, Clone, Default)]
pub struct CharacterView {
    pub starred: Vec<Character>,
    pub regular: Vec<Character>,
    /// Whether the catalog has another page for the current filter.
    pub has_more: bool,
    /// Characters matching the filter across all remote pages.
    pub total: u32,
}

impl CharacterView {
    pub fn len(&self) -> usize {
        self.starred.len() + self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starred.is_empty() && self.regular.is_empty()
    }
}

/// Owns the canonical local state - favorites, comments, criteria - and
/// merges it with remotely fetched pages into the view the user sees.
///
/// Built explicitly from its collaborators; tests construct throwaway
/// instances on in-memory stores with scripted sources.
pub struct Catalog {
    source: Box<dyn CharacterSource>,
    store: Arc<StateStore>,
    favorites: FavoritesRegistry,
    comments: CommentsLedger,
    prefs: Preferences,
    /// Session-only; deliberately not part of the persisted bundle.
    selected: Option<Character>,
}

impl Catalog {
    /// Wire up a catalog. Persisted favorites, comments and preferences
    /// load here, once; everything after that is mutate-then-persist.
    pub fn new(source: Box<dyn CharacterSource>, store: Arc<StateStore>) -> Self {
        let favorites = FavoritesRegistry::load(Arc::clone(&store));
        let comments = CommentsLedger::load(Arc::clone(&store));
        let prefs = Preferences::load(&store);

        Self {
            source,
            store,
            favorites,
            comments,
            prefs,
            selected: None,
        }
    }

    // ---- derived view ----

    /// Run one fetch cycle for the current page and criteria.
    ///
    /// A failed fetch surfaces as an error and leaves every piece of
    /// local state - the page cursor included - exactly where it was;
    /// retrying is just calling this again.
    pub async fn request_page(&self) -> Result<CharacterView> {
        self.fetch_view(self.prefs.current_page).await
    }

    /// Fetch the next page, then advance the cursor. The cursor only
    /// moves once the fetch succeeded, so a dead network can't strand the
    /// session on a page it never saw. Each page replaces the previous
    /// one; callers wanting infinite scroll accumulate views themselves.
    pub async fn load_more(&mut self) -> Result<CharacterView> {
        let next = self.prefs.current_page + 1;
        let fetched = self.fetch_view(next).await?;

        self.prefs.current_page = next;
        self.prefs.save(&self.store);
        Ok(fetched)
    }

    async fn fetch_view(&self, page: u32) -> Result<CharacterView> {
        debug!("Fetching page {} with {:?}", page, self.prefs.filters);
        let fetched = self.source.fetch_page(page, &self.prefs.filters).await?;
        info!(
            "Merging {} fetched character(s) with {} favorite(s)",
            fetched.characters.len(),
            self.favorites.len()
        );

        // Favorites missing from the page are appended so they never drop
        // out of the view; on an id collision the remote copy wins (its
        // attributes are fresher) while the star itself always comes from
        // the registry.
        let mut merged = fetched.characters;
        for favorite in self.favorites.all() {
            if !merged.iter().any(|c| c.id == favorite.id) {
                merged.push(favorite.clone());
            }
        }

        // The server already filtered its side, but the injected
        // favorites never passed through it - so filter again locally.
        let filtered = view::filter_characters(&merged, &self.prefs.filters);
        let sorted = view::sort_characters(filtered, self.prefs.sort_by, self.prefs.sort_order);

        let (mut starred, mut regular): (Vec<_>, Vec<_>) = sorted
            .into_iter()
            .partition(|c| self.favorites.is_favorite(&c.id));

        match self.prefs.filters.scope {
            Some(FavoriteScope::Starred) => regular.clear(),
            Some(FavoriteScope::Others) => starred.clear(),
            None => {}
        }

        Ok(CharacterView {
            starred,
            regular,
            has_more: fetched.next_page.is_some(),
            total: fetched.total,
        })
    }

    /// Single-character lookup: the catalog first (fresher data), the
    /// favorite snapshot when the catalog no longer knows the id. Only
    /// when neither side has it does this become `NotFound`; transport
    /// failures pass through untouched.
    pub async fn character_detail(&self, id: &str) -> Result<Character> {
        match self.source.fetch_character(id).await {
            Ok(character) => Ok(character),
            Err(Error::NotFound(_)) => self
                .favorites
                .all()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| Error::NotFound(id.to_string())),
            Err(err) => Err(err),
        }
    }

    // ---- criteria ----

    /// Replace the filter criteria wholesale. Any filter change
    /// invalidates the remote page sequence, so the cursor resets to 1.
    pub fn set_filters(&mut self, filters: FilterCriteria) {
        self.prefs.filters = filters;
        self.prefs.current_page = 1;
        self.prefs.save(&self.store);
    }

    pub fn set_sort(&mut self, sort_by: SortField, sort_order: SortOrder) {
        self.prefs.sort_by = sort_by;
        self.prefs.sort_order = sort_order;
        self.prefs.save(&self.store);
    }

    /// Search text feeds the name filter; blank input clears it. Counts
    /// as a filter change, so the cursor resets too.
    pub fn set_search_term(&mut self, term: &str) {
        let trimmed = term.trim();
        self.prefs.search_term = term.to_string();
        self.prefs.filters.name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.prefs.current_page = 1;
        self.prefs.save(&self.store);
    }

    /// Jump straight to a page. Page numbers start at 1.
    pub fn set_current_page(&mut self, page: u32) {
        self.prefs.current_page = page.max(1);
        self.prefs.save(&self.store);
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    // ---- favorites ----

    pub fn toggle_favorite(&mut self, character: &Character) {
        self.favorites.toggle(character);
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    pub fn favorites(&self) -> &[Character] {
        self.favorites.all()
    }

    // ---- comments ----

    pub fn add_comment(&mut self, text: &str, character_id: &str) -> Option<Comment> {
        self.comments.add(text, character_id)
    }

    pub fn remove_comment(&mut self, id: &str) {
        self.comments.remove(id);
    }

    pub fn comments_for(&self, character_id: &str) -> Vec<Comment> {
        self.comments.for_character(character_id)
    }

    // ---- selection (session-only) ----

    pub fn select(&mut self, character: Option<Character>) {
        self.selected = character;
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }
}
