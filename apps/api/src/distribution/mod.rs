// Profession distribution: where in Italy a profession's workforce lives.
// Generation and geocoding are the only flaky upstreams in the system; both
// results are memoized in bounded TTL caches owned by the service.

pub mod cache;
pub mod generator;
pub mod geocoder;
pub mod handlers;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use cache::TtlCache;
use generator::{DistributionGenerator, PlaceShare};
use geocoder::{Coordinates, Geocoder};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDistribution {
    pub place: String,
    pub distribution: f64,
    pub coordinates: Coordinates,
}

pub struct DistributionService {
    generator: Arc<dyn DistributionGenerator>,
    geocoder: Arc<dyn Geocoder>,
    professions: TtlCache<String, Vec<PlaceShare>>,
    places: TtlCache<String, Coordinates>,
}

impl DistributionService {
    pub fn new(
        generator: Arc<dyn DistributionGenerator>,
        geocoder: Arc<dyn Geocoder>,
        cache_capacity: usize,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            generator,
            geocoder,
            professions: TtlCache::new(cache_capacity, cache_ttl),
            places: TtlCache::new(cache_capacity, cache_ttl),
        }
    }

    /// Generates (or recalls) the distribution for `profession` and attaches
    /// coordinates to every place. Any geocoding failure fails the whole call.
    pub async fn distribution(&self, profession: &str) -> Result<Vec<PlaceDistribution>, AppError> {
        let key = normalize_profession(profession);
        if key.is_empty() {
            return Err(AppError::Validation("Profession is required".to_string()));
        }

        let shares = match self.professions.get(&key).await {
            Some(shares) => {
                debug!("Distribution cache hit for '{key}'");
                shares
            }
            None => {
                let shares = self.generator.generate(&key).await?;
                self.professions.insert(key.clone(), shares.clone()).await;
                shares
            }
        };

        let mut located = Vec::with_capacity(shares.len());
        for share in shares {
            let coordinates = self.coordinates(&share.place).await?;
            located.push(PlaceDistribution {
                place: share.place,
                distribution: share.distribution,
                coordinates,
            });
        }
        Ok(located)
    }

    async fn coordinates(&self, place: &str) -> Result<Coordinates, AppError> {
        if let Some(hit) = self.places.get(&place.to_string()).await {
            return Ok(hit);
        }
        let coordinates = self.geocoder.locate(place).await?;
        self.places.insert(place.to_string(), coordinates).await;
        Ok(coordinates)
    }
}

pub fn normalize_profession(profession: &str) -> String {
    profession.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGenerator, FakeGeocoder};

    fn service(generator: Arc<FakeGenerator>, geocoder: Arc<FakeGeocoder>) -> DistributionService {
        DistributionService::new(generator, geocoder, 16, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_generation_is_cached_by_normalized_profession() {
        let generator = Arc::new(FakeGenerator::default());
        let geocoder = Arc::new(FakeGeocoder::default());
        let service = service(generator.clone(), geocoder.clone());

        let first = service.distribution("  Infermiere ").await.unwrap();
        let second = service.distribution("infermiere").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(generator.calls(), vec!["infermiere".to_string()]);
        // milano and roma looked up once each
        assert_eq!(geocoder.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_places_are_geocoded_in_order() {
        let service = service(
            Arc::new(FakeGenerator::default()),
            Arc::new(FakeGeocoder::default()),
        );
        let result = service.distribution("architetto").await.unwrap();
        let places: Vec<_> = result.iter().map(|p| p.place.as_str()).collect();
        assert_eq!(places, vec!["milano", "roma"]);
        assert!((result[0].coordinates.lat - 45.4642).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_place_fails_the_request() {
        let generator = Arc::new(FakeGenerator::with_places(&[("milano", 0.5), ("atlantide", 0.5)]));
        let service = service(generator, Arc::new(FakeGeocoder::default()));
        let err = service.distribution("sviluppatore").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_blank_profession_is_rejected() {
        let generator = Arc::new(FakeGenerator::default());
        let service = service(generator.clone(), Arc::new(FakeGeocoder::default()));
        let err = service.distribution("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(generator.calls().is_empty());
    }
}
