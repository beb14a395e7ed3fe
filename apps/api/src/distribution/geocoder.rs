//! Place-name geocoding against a Nominatim-compatible search API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(u16),

    #[error("No coordinates found for place: {0}")]
    NotFound(String),

    #[error("invalid coordinate '{0}'")]
    BadCoordinate(String),
}

impl From<GeocodeError> for AppError {
    fn from(error: GeocodeError) -> Self {
        AppError::Upstream(error.to_string())
    }
}

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, place: &str) -> Result<Coordinates, AppError>;
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl TryFrom<&SearchHit> for Coordinates {
    type Error = GeocodeError;

    fn try_from(hit: &SearchHit) -> Result<Self, Self::Error> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| GeocodeError::BadCoordinate(raw.to_string()))
        };
        Ok(Coordinates {
            lat: parse(&hit.lat)?,
            lon: parse(&hit.lon)?,
        })
    }
}

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    backoff: Duration,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            backoff: Duration::from_secs(1),
        })
    }

    /// Base delay for exponential backoff between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn search(&self, place: &str) -> Result<Vec<SearchHit>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let mut last_error: Option<GeocodeError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "Geocoding '{}' attempt {} failed, retrying after {}ms...",
                    place,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .get(&url)
                .query(&[("q", place), ("format", "jsonv2")])
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GeocodeError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                last_error = Some(GeocodeError::Status(status.as_u16()));
                continue;
            }
            if !status.is_success() {
                return Err(GeocodeError::Status(status.as_u16()));
            }

            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or(GeocodeError::Status(StatusCode::TOO_MANY_REQUESTS.as_u16())))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn locate(&self, place: &str) -> Result<Coordinates, AppError> {
        let hits = self.search(place).await?;
        let first = hits
            .first()
            .ok_or_else(|| GeocodeError::NotFound(place.to_string()))?;
        Ok(Coordinates::try_from(first)?)
    }
}
