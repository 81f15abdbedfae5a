// Core business logic lives here - the brain of the operation
pub mod catalog;
pub mod comments;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod prefs;
pub mod provider;
pub mod source;
pub mod view;

pub use catalog::{Catalog, CharacterView};
pub use comments::{Comment, CommentsLedger};
pub use config::Config;
pub use error::Error;
pub use favorites::FavoritesRegistry;
pub use prefs::Preferences;
pub use provider::RemoteCatalog;
pub use source::{CharacterSource, SourcePage};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
