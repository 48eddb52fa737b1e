//! Track and book listings over HTTP
//!
//! Both endpoints return JSON arrays of loosely-typed objects. Each element
//! is decoded on its own; records that are mistyped or lack a required field
//! are dropped here so the screens only ever see complete [`Track`]s and
//! [`Book`]s.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::model::{Book, Track};
use crate::{log_service_request, log_service_result};
use super::ContentService;

const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Deserialize)]
struct RawTrack {
    id: Option<serde_json::Value>,
    title: Option<String>,
    #[serde(alias = "artist")]
    subtitle: Option<String>,
    #[serde(alias = "url")]
    audio_url: Option<String>,
    #[serde(alias = "duration")]
    duration_secs: Option<u32>,
    #[serde(alias = "image")]
    artwork_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBook {
    id: Option<serde_json::Value>,
    title: Option<String>,
    author: Option<String>,
    category: Option<String>,
    #[serde(alias = "cover")]
    cover_url: Option<String>,
    description: Option<String>,
}

/// Ids arrive as either strings or numbers.
fn id_string(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TryFrom<RawTrack> for Track {
    type Error = &'static str;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        Ok(Track {
            id: id_string(raw.id).ok_or("missing id")?,
            title: required(raw.title).ok_or("missing title")?,
            audio_url: required(raw.audio_url).ok_or("missing audio url")?,
            subtitle: raw.subtitle.unwrap_or_default(),
            duration_secs: raw.duration_secs,
            artwork_url: required(raw.artwork_url),
        })
    }
}

impl TryFrom<RawBook> for Book {
    type Error = &'static str;

    fn try_from(raw: RawBook) -> Result<Self, Self::Error> {
        Ok(Book {
            id: id_string(raw.id).ok_or("missing id")?,
            title: required(raw.title).ok_or("missing title")?,
            author: raw.author.unwrap_or_default(),
            category: required(raw.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            cover_url: required(raw.cover_url),
            description: raw.description,
        })
    }
}

/// Decode and convert wire records one at a time, logging and skipping the
/// mistyped or incomplete ones.
fn validate_records<R, T>(kind: &str, raw: Vec<serde_json::Value>) -> Vec<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = &'static str>,
{
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = match serde_json::from_value::<R>(value) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(kind, index, error = %e, "Dropping mistyped record");
                    return None;
                }
            };
            match T::try_from(record) {
                Ok(record) => Some(record),
                Err(reason) => {
                    tracing::warn!(kind, index, reason, "Dropping invalid record");
                    None
                }
            }
        })
        .collect();

    if records.len() < total {
        tracing::info!(kind, kept = records.len(), total, "Some records were invalid");
    }
    records
}

pub struct HttpContentService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentService {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(&self, path: &str) -> Result<Vec<serde_json::Value>, AppError> {
        let url = format!("{}/{}", self.base_url, path);
        log_service_request!("content.get", url = %url);

        let result = async {
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<serde_json::Value>>()
                .await
        }
        .await;

        log_service_result!("content.get", result);
        result.map_err(AppError::fetch)
    }
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn fetch_tracks(&self) -> Result<Vec<Track>, AppError> {
        let raw = self.get_json("tracks").await?;
        Ok(validate_records::<RawTrack, _>("track", raw))
    }

    async fn fetch_books(&self) -> Result<Vec<Book>, AppError> {
        let raw = self.get_json("books").await?;
        Ok(validate_records::<RawBook, _>("book", raw))
    }
}
