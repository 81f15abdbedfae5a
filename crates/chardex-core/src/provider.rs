// Live catalog provider - bridges the HTTP client with the CharacterSource trait
use async_trait::async_trait;
use chardex_api::{ApiCharacter, CatalogClient, CatalogError, PageFilter};

use crate::{
    models::{Character, CharacterGender, CharacterStatus, FilterCriteria, LocationRef},
    source::{CharacterSource, SourcePage},
    Error, Result,
};

/// Wrapper around CatalogClient that implements CharacterSource
pub struct RemoteCatalog {
    client: CatalogClient,
}

impl RemoteCatalog {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CharacterSource for RemoteCatalog {
    async fn fetch_page(&self, page: u32, filter: &FilterCriteria) -> Result<SourcePage> {
        let fetched = self
            .client
            .fetch_page(page, &to_page_filter(filter))
            .await
            .map_err(map_catalog_error)?;

        Ok(SourcePage {
            characters: fetched.results.into_iter().map(api_to_character).collect(),
            next_page: fetched.info.next,
            total: fetched.info.count,
        })
    }

    async fn fetch_character(&self, id: &str) -> Result<Character> {
        let fetched = self
            .client
            .fetch_character(id)
            .await
            .map_err(map_catalog_error)?;

        Ok(api_to_character(fetched))
    }
}

/// Keep NotFound distinct; everything else collapses into an API failure.
fn map_catalog_error(err: CatalogError) -> Error {
    match err {
        CatalogError::NotFound(what) => Error::NotFound(what),
        other => Error::ApiError(other.to_string()),
    }
}

/// Only the fields the catalog matches server-side cross the wire.
fn to_page_filter(filter: &FilterCriteria) -> PageFilter {
    PageFilter {
        name: filter.name.clone(),
        status: filter.status.clone(),
        species: filter.species.clone(),
        gender: filter.gender.clone(),
    }
}

/// Convert a wire character to our internal model
fn api_to_character(api: ApiCharacter) -> Character {
    Character {
        id: api.id,
        name: api.name,
        status: CharacterStatus::parse(&api.status),
        species: api.species,
        kind: api.type_field,
        gender: CharacterGender::parse(&api.gender),
        image: api.image,
        origin: api.origin.map(to_location).unwrap_or_default(),
        location: api.location.map(to_location).unwrap_or_default(),
        episode: api.episode,
        created: api.created,
    }
}

fn to_location(api: chardex_api::ApiLocationRef) -> LocationRef {
    LocationRef {
        name: api.name,
        url: api.url,
    }
}
