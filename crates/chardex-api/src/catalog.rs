use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::retry::{is_retryable_status, with_retry, RetryConfig};

const CATALOG_API_BASE: &str = "https://rickandmortyapi.com/api";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Catalog server error: {0}")]
    ServerError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Character not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl CatalogError {
    /// Worth another attempt? Server hiccups and network trouble are,
    /// 404s and malformed payloads are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::ServerError(_)
                | CatalogError::RateLimitExceeded
                | CatalogError::NetworkError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Filter fields the catalog matches server-side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFilter {
    pub name: Option<String>,
    pub status: Option<String>,
    pub species: Option<String>,
    pub gender: Option<String>,
}

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl CatalogClient {
    pub fn new() -> Self {
        Self::with_base_url(CATALOG_API_BASE.to_string())
    }

    /// For self-hosted catalog mirrors
    pub fn with_base_url(base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Chardex/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url,
            retry_config: RetryConfig::default(),
        }
    }

    /// Create client with custom retry configuration
    pub fn with_config(base_url: String, retry_config: RetryConfig) -> Self {
        let mut client = Self::with_base_url(base_url);
        client.retry_config = retry_config;
        client
    }

    /// Fetch one page of characters matching the filter.
    ///
    /// The catalog answers an unmatched filter or an out-of-range page
    /// with a 404; callers see that as an empty final page rather than an
    /// error, matching how the catalog's own clients behave.
    pub async fn fetch_page(&self, page: u32, filter: &PageFilter) -> Result<CharacterPage> {
        let url = format!("{}/character", self.base_url);

        with_retry(&self.retry_config, CatalogError::is_transient, || async {
            let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
            if let Some(ref name) = filter.name {
                query.push(("name", name.clone()));
            }
            if let Some(ref status) = filter.status {
                query.push(("status", status.clone()));
            }
            if let Some(ref species) = filter.species {
                query.push(("species", species.clone()));
            }
            if let Some(ref gender) = filter.gender {
                query.push(("gender", gender.clone()));
            }

            let response = self.client.get(&url).query(&query).send().await?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                debug!("Catalog has nothing for page {} with this filter", page);
                return Ok(CharacterPage::empty());
            }

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(CatalogError::RateLimitExceeded);
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();

                if is_retryable_status(status) {
                    return Err(CatalogError::ServerError(format!(
                        "Status {}: {}",
                        status, body
                    )));
                }

                return Err(CatalogError::RequestFailed(format!(
                    "Status {}: {}",
                    status, body
                )));
            }

            let body = response.text().await?;
            let fetched: CharacterPage = serde_json::from_str(&body)?;
            Ok(fetched)
        })
        .await
    }

    /// Look up a single character by id. A 404 here is a real
    /// `NotFound`, never an empty result.
    pub async fn fetch_character(&self, id: &str) -> Result<ApiCharacter> {
        let url = format!("{}/character/{}", self.base_url, id);

        with_retry(&self.retry_config, CatalogError::is_transient, || async {
            let response = self.client.get(&url).send().await?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound(id.to_string()));
            }

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(CatalogError::RateLimitExceeded);
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();

                if is_retryable_status(status) {
                    return Err(CatalogError::ServerError(format!(
                        "Status {}: {}",
                        status, body
                    )));
                }

                return Err(CatalogError::RequestFailed(format!(
                    "Status {}: {}",
                    status, body
                )));
            }

            let body = response.text().await?;
            let character: ApiCharacter = serde_json::from_str(&body)?;
            Ok(character)
        })
        .await
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of the character catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    #[serde(default)]
    pub results: Vec<ApiCharacter>,
}

impl CharacterPage {
    /// The page the catalog never had: no results, no continuation.
    pub fn empty() -> Self {
        Self {
            info: PageInfo {
                count: 0,
                pages: 0,
                next: None,
                prev: None,
            },
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
    /// Next page number, if there is one. Some deployments send a plain
    /// integer, some send the full next-page URL - both are accepted.
    #[serde(default, deserialize_with = "deserialize_page_ref")]
    pub next: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_page_ref")]
    pub prev: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCharacter {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
    #[serde(default, rename = "type")]
    pub type_field: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub origin: Option<ApiLocationRef>,
    #[serde(default)]
    pub location: Option<ApiLocationRef>,
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLocationRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Character ids arrive as integers from some deployments and strings
/// from others; we keep them as strings internally.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(u64),
        Text(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(n) => n.to_string(),
        IdRepr::Text(s) => s,
    })
}

/// Accepts a page number, null, or a next/prev URL carrying a `page`
/// query parameter. Zero means "no more pages", same as null.
fn deserialize_page_ref<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageRef {
        Number(u32),
        Url(String),
    }

    Ok(match Option::<PageRef>::deserialize(deserializer)? {
        None => None,
        Some(PageRef::Number(0)) => None,
        Some(PageRef::Number(n)) => Some(n),
        Some(PageRef::Url(url)) => page_from_url(&url),
    })
}

/// Pull the `page` query parameter out of a pagination URL.
fn page_from_url(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "page" {
            value.parse().ok()
        } else {
            None
        }
    })
}
