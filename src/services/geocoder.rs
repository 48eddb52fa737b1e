//! Place-name search against a Nominatim-compatible geocoder

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::model::Place;
use crate::{log_service_request, log_service_result};
use super::LocationSearch;

/// Nominatim sends coordinates as strings.
#[derive(Debug, Deserialize)]
struct RawPlace {
    display_name: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
}

impl TryFrom<RawPlace> for Place {
    type Error = &'static str;

    fn try_from(raw: RawPlace) -> Result<Self, Self::Error> {
        let name = raw
            .display_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or("missing name")?;
        let latitude: f64 = raw
            .lat
            .and_then(|s| s.trim().parse().ok())
            .ok_or("bad latitude")?;
        let longitude: f64 = raw
            .lon
            .and_then(|s| s.trim().parse().ok())
            .ok_or("bad longitude")?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err("coordinates out of range");
        }

        Ok(Place { name, latitude, longitude })
    }
}

fn parse_places(raw: Vec<RawPlace>) -> Vec<Place> {
    raw.into_iter()
        .filter_map(|record| match Place::try_from(record) {
            Ok(place) => Some(place),
            Err(reason) => {
                tracing::warn!(reason, "Dropping invalid place");
                None
            }
        })
        .collect()
}

pub struct NominatimSearch {
    client: reqwest::Client,
    endpoint: String,
    limit: usize,
}

impl NominatimSearch {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, limit: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            limit,
        }
    }
}

#[async_trait]
impl LocationSearch for NominatimSearch {
    async fn search(&self, query: &str) -> Result<Vec<Place>, AppError> {
        log_service_request!("geocoder.search", query, limit = self.limit);

        let limit = self.limit.to_string();
        let result = async {
            self.client
                .get(&self.endpoint)
                .query(&[("q", query), ("format", "json"), ("limit", limit.as_str())])
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<RawPlace>>()
                .await
        }
        .await;

        log_service_result!("geocoder.search", result);
        let places = parse_places(result.map_err(AppError::fetch)?);
        tracing::debug!(query, count = places.len(), "Places found");
        Ok(places)
    }
}
