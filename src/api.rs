use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.artic.edu/api/v1/artworks";
pub const DEFAULT_IIIF_BASE: &str = "https://www.artic.edu/iiif/2";

const SUMMARY_FIELDS: &str = "id,title,image_id,category_titles";
const DETAIL_FIELDS: &str =
    "id,title,image_id,artist_display,main_reference_number,dimensions,thumbnail";

/// Lightweight artwork record used by the listing grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtworkSummary {
    pub id: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "image_id")]
    pub image_id: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub category_titles: Vec<String>,
}

/// Full artwork record for the detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtworkDetail {
    pub id: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "or_default")]
    pub artist_display: String,
    #[serde(default, deserialize_with = "or_default")]
    pub main_reference_number: String,
    #[serde(default, deserialize_with = "or_default")]
    pub dimensions: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default, deserialize_with = "image_id")]
    pub image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Thumbnail {
    /// Low-quality image placeholder, a base64 data URI.
    #[serde(default, deserialize_with = "or_default")]
    pub lqip: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationInfo {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

impl PaginationInfo {
    /// Number of pages reported by the server, never less than one.
    pub fn page_count(&self) -> u32 {
        let pages = self.total_pages.unwrap_or(self.total);
        pages.clamp(1, u32::MAX as u64) as u32
    }
}

/// One page of listing or search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub data: Vec<ArtworkSummary>,
    pub pagination: PaginationInfo,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

// ── Wire helpers ──

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawImageId {
    Text(String),
    Number(u64),
}

/// The live API sends UUID strings; older payloads carry integers.
fn image_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawImageId>::deserialize(deserializer)? {
        Some(RawImageId::Text(s)) if !s.is_empty() => Some(s),
        Some(RawImageId::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Build the IIIF thumbnail URL for an image identifier.
pub fn image_url(iiif_base: &str, image_id: &str) -> String {
    format!(
        "{}/{}/full/200,/0/default.jpg",
        iiif_base.trim_end_matches('/'),
        image_id
    )
}

/// Errors produced by catalogue requests.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message shown in a screen's error banner.
    pub fn user_message(&self) -> String {
        format!("Failed to fetch data ({})", self)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404 })
    }
}

/// HTTP client for the artworks catalogue.
#[derive(Debug, Clone)]
pub struct CatalogueClient {
    http: reqwest::Client,
    base: String,
}

impl CatalogueClient {
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// `GET {base}?page=&limit=`
    pub async fn list(&self, page: u32, limit: u32) -> Result<Page, ApiError> {
        let query = [
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("fields", SUMMARY_FIELDS.to_string()),
        ];
        self.get_json(&self.base, &query).await
    }

    /// `GET {base}/search?q=&page=&limit=`
    pub async fn search(&self, text: &str, page: u32, limit: u32) -> Result<Page, ApiError> {
        let url = format!("{}/search", self.base);
        let query = [
            ("q", text.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("fields", SUMMARY_FIELDS.to_string()),
        ];
        self.get_json(&url, &query).await
    }

    /// `GET {base}/{id}`
    pub async fn artwork(&self, id: u64) -> Result<ArtworkDetail, ApiError> {
        let url = format!("{}/{}", self.base, id);
        let query = [("fields", DETAIL_FIELDS.to_string())];
        let envelope: Envelope<ArtworkDetail> = self.get_json(&url, &query).await?;
        Ok(envelope.data)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!(url, ?query, "catalogue request");
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
