mod auth;
mod config;
mod cv;
mod db;
mod distribution;
mod errors;
mod extractors;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;
mod talent;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use aws_config::meta::region::RegionProviderChain;
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::cv::extract::DocumentTextExtractor;
use crate::cv::file_store::{FileStore, LocalFileStore, S3FileStore};
use crate::db::{create_pool, ensure_schema};
use crate::distribution::generator::{
    DistributionGenerator, LlmDistributionGenerator, UnconfiguredGenerator,
};
use crate::distribution::geocoder::NominatimGeocoder;
use crate::distribution::DistributionService;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{default_user, seed::generate_mock_candidates, MemStorage, PgStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentMap API v{}", env!("CARGO_PKG_VERSION"));

    let storage = build_storage(&config).await?;
    let files = build_file_store(&config).await;
    let upstream_timeout = Duration::from_secs(config.upstream_timeout_secs);

    let generator: Arc<dyn DistributionGenerator> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.anthropic_base_url.clone(), upstream_timeout)
                .context("failed to build LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmDistributionGenerator(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; /api/distribution will fail");
            Arc::new(UnconfiguredGenerator)
        }
    };
    let geocoder = NominatimGeocoder::new(config.geocoder_url.clone(), upstream_timeout)
        .context("failed to build geocoder client")?;
    let distribution = DistributionService::new(
        generator,
        Arc::new(geocoder),
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_secs),
    );

    let state = AppState {
        storage,
        sessions: SessionStore::default(),
        files,
        extractor: Arc::new(DocumentTextExtractor::default()),
        distribution: Arc::new(distribution),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-lifetime store.
/// Either way the store starts with the mock candidates and the default user.
async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let candidates = generate_mock_candidates(config.seed_candidates, config.seed_rng);

    match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            let storage = PgStorage::new(pool);
            storage
                .bootstrap(candidates, default_user())
                .await
                .context("failed to seed database")?;
            Ok(Arc::new(storage))
        }
        None => {
            info!(
                "DATABASE_URL not set; using in-memory storage with {} candidates",
                candidates.len()
            );
            let storage = MemStorage::new(candidates, vec![default_user()])
                .context("failed to seed in-memory storage")?;
            Ok(Arc::new(storage))
        }
    }
}

async fn build_file_store(config: &Config) -> Arc<dyn FileStore> {
    match &config.s3_bucket {
        Some(bucket) => {
            let client = build_s3_client(config.s3_endpoint.as_deref()).await;
            info!("CV uploads go to s3://{bucket}");
            Arc::new(S3FileStore::new(client, bucket.clone()))
        }
        None => {
            info!("CV uploads go to {}", config.upload_dir);
            Arc::new(LocalFileStore::new(&config.upload_dir))
        }
    }
}

/// Constructs an S3 client from the default AWS credential chain. A custom
/// endpoint (MinIO and friends) switches to path-style addressing.
async fn build_s3_client(endpoint: Option<&str>) -> aws_sdk_s3::Client {
    let region = RegionProviderChain::default_provider().or_else("us-east-1");
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let shared = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(endpoint.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}

fn build_cors(config: &Config) -> Result<CorsLayer> {
    match &config.cors_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("invalid CORS_ORIGIN '{origin}'"))?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([CONTENT_TYPE]))
        }
        None => Ok(CorsLayer::permissive()),
    }
}
