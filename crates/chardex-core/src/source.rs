use crate::{
    models::{Character, FilterCriteria},
    Result,
};

/// One page handed back by a character source.
#[derive(Debug, Clone)]
pub struct SourcePage {
    pub characters: Vec<Character>,
    /// Next page number when the source has more to give.
    pub next_page: Option<u32>,
    /// Characters matching the filter across all pages, not just this one.
    pub total: u32,
}

/// Trait for character sources - makes testing easier and keeps things flexible
///
/// The live implementation talks HTTP to the catalog; tests plug in
/// canned pages and scripted failures.
#[async_trait::async_trait]
pub trait CharacterSource: Send + Sync {
    /// Fetch one page matching the filter. The source applies
    /// name/status/species/gender matching on its side.
    async fn fetch_page(&self, page: u32, filter: &FilterCriteria) -> Result<SourcePage>;

    /// Look up a single character by id.
    async fn fetch_character(&self, id: &str) -> Result<Character>;
}
