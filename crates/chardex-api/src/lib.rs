// HTTP client for the remote character catalog
pub mod catalog;
pub mod retry;

// Re-export common types
pub use catalog::{
    ApiCharacter, ApiLocationRef, CatalogClient, CatalogError, CharacterPage, PageFilter, PageInfo,
};
pub use retry::RetryConfig;
