use std::sync::Arc;

use crate::auth::session::SessionStore;
use crate::cv::extract::TextExtractor;
use crate::cv::file_store::FileStore;
use crate::distribution::DistributionService;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidates, users and CV records. In-memory or Postgres, chosen at startup.
    pub storage: Arc<dyn Storage>,
    pub sessions: SessionStore,
    /// Where uploaded CV files land (local disk or S3).
    pub files: Arc<dyn FileStore>,
    pub extractor: Arc<dyn TextExtractor>,
    /// Profession distribution lookups, with their generation and geocoding caches.
    pub distribution: Arc<DistributionService>,
}
