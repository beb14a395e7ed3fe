//! Shared fixtures for router-level tests: an in-memory app with fake
//! upstreams, plus request builders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::auth::session::SessionStore;
use crate::cv::extract::{ExtractError, TextExtractor};
use crate::cv::file_store::LocalFileStore;
use crate::distribution::generator::{DistributionGenerator, PlaceShare};
use crate::distribution::geocoder::{Coordinates, GeocodeError, Geocoder};
use crate::distribution::DistributionService;
use crate::errors::AppError;
use crate::models::cv::ExtractedData;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{default_user, seed::generate_mock_candidates, MemStorage};

const BOUNDARY: &str = "talentmap-test-boundary";

pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<MemStorage>,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }
}

/// 500 seeded candidates, the default admin user, uploads in a temp dir.
pub fn test_app() -> TestApp {
    let storage = Arc::new(
        MemStorage::new(generate_mock_candidates(500, 42), vec![default_user()])
            .expect("seed store"),
    );
    let uploads = tempfile::tempdir().expect("temp upload dir");
    let distribution = DistributionService::new(
        Arc::new(FakeGenerator::default()),
        Arc::new(FakeGeocoder::default()),
        16,
        Duration::from_secs(60),
    );
    let state = AppState {
        storage: storage.clone(),
        sessions: SessionStore::default(),
        files: Arc::new(LocalFileStore::new(uploads.path())),
        extractor: Arc::new(FakeExtractor),
        distribution: Arc::new(distribution),
    };
    TestApp {
        state,
        storage,
        uploads,
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Runs one request and returns the status with the JSON body (`Null` if empty).
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

/// Logs in as the seeded admin and returns the `sid=...` cookie pair.
pub async fn login(app: &TestApp) -> String {
    let request = json_request(
        Method::POST,
        "/api/auth/login",
        serde_json::json!({"email": "admin@example.com", "password": "password123"}),
    );
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

pub struct Part {
    name: String,
    file: Option<(String, String)>,
    data: Vec<u8>,
}

impl Part {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            file: Some((file_name.to_string(), content_type.to_string())),
            data: data.to_vec(),
        }
    }
}

pub fn multipart_request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    parts: &[Part],
) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match &part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Returns a fixed distribution and records every profession it was asked for.
pub struct FakeGenerator {
    places: Vec<PlaceShare>,
    calls: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn with_places(places: &[(&str, f64)]) -> Self {
        Self {
            places: places
                .iter()
                .map(|(place, distribution)| PlaceShare {
                    place: place.to_string(),
                    distribution: *distribution,
                })
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for FakeGenerator {
    fn default() -> Self {
        Self::with_places(&[("milano", 0.6), ("roma", 0.4)])
    }
}

#[async_trait]
impl DistributionGenerator for FakeGenerator {
    async fn generate(&self, profession: &str) -> Result<Vec<PlaceShare>, AppError> {
        self.calls.lock().unwrap().push(profession.to_string());
        Ok(self.places.clone())
    }
}

/// Knows a couple of Italian cities; anything else is not found.
pub struct FakeGeocoder {
    known: HashMap<&'static str, Coordinates>,
    calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for FakeGeocoder {
    fn default() -> Self {
        Self {
            known: HashMap::from([
                ("milano", Coordinates { lat: 45.4642, lon: 9.19 }),
                ("roma", Coordinates { lat: 41.9028, lon: 12.4964 }),
            ]),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn locate(&self, place: &str) -> Result<Coordinates, AppError> {
        self.calls.lock().unwrap().push(place.to_string());
        self.known
            .get(place)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(place.to_string()).into())
    }
}

/// PDFs "extract" to a canned string; images fail as if OCR broke.
pub struct FakeExtractor;

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(
        &self,
        mime_type: &str,
        file_name: &str,
        _bytes: Bytes,
    ) -> Result<ExtractedData, ExtractError> {
        if mime_type.contains("image") {
            return Err(ExtractError::Ocr("tesseract exited with status 1".to_string()));
        }
        let text = if mime_type.contains("pdf") {
            format!("text of {file_name}")
        } else {
            String::new()
        };
        Ok(ExtractedData { text })
    }
}
