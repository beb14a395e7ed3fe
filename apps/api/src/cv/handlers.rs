//! Axum route handlers for CV upload and status.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::CurrentUser;
use crate::cv::file_store::UploadScope;
use crate::errors::AppError;
use crate::models::cv::{CvOwner, CvRecord, CvStatus, ExtractedData, NewCv};
use crate::state::AppState;

/// Upload cap for a single CV file.
pub const MAX_CV_BYTES: usize = 5 * 1024 * 1024;
/// Body limit for the upload routes: the file plus room for the form fields.
pub const UPLOAD_BODY_LIMIT: usize = MAX_CV_BYTES + 64 * 1024;

const FILE_FIELD: &str = "cv";

#[derive(Debug)]
struct UploadedFile {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

#[derive(Debug, Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvStatusResponse {
    pub status: CvStatus,
    pub error_message: Option<String>,
}

/// POST /api/cv/upload
pub async fn upload_cv(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<Json<CvRecord>, AppError> {
    let form = read_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let cv = ingest(&state, CvOwner::User(user.id), UploadScope::User, file).await?;
    Ok(Json(cv))
}

/// POST /api/public/cv/upload
pub async fn upload_public_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CvRecord>, AppError> {
    let form = read_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let (Some(first_name), Some(last_name)) = (
        non_blank(form.first_name),
        non_blank(form.last_name),
    ) else {
        return Err(AppError::Validation(
            "First name and last name are required".to_string(),
        ));
    };

    let owner = CvOwner::Public {
        first_name,
        last_name,
    };
    let cv = ingest(&state, owner, UploadScope::Public, file).await?;
    Ok(Json(cv))
}

/// GET /api/cv
pub async fn list_cvs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CvRecord>>, AppError> {
    Ok(Json(state.storage.list_cvs_for_user(user.id).await?))
}

/// GET /api/cv/:id/status
///
/// Only the uploading user may read a CV's status; public uploads have no owner
/// and are therefore never readable here.
pub async fn cv_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<CvStatusResponse>, AppError> {
    let id: i32 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Invalid CV ID".to_string()))?;

    let cv = state
        .storage
        .get_cv(id)
        .await?
        .ok_or_else(|| AppError::NotFound("CV not found".to_string()))?;

    if cv.user_id != Some(user.id) {
        return Err(AppError::Forbidden);
    }

    Ok(Json(CvStatusResponse {
        status: cv.status,
        error_message: cv.error_message,
    }))
}

async fn ingest(
    state: &AppState,
    owner: CvOwner,
    scope: UploadScope,
    file: UploadedFile,
) -> Result<CvRecord, AppError> {
    let file_path = state
        .files
        .save(scope, &file.file_name, &file.content_type, file.bytes.clone())
        .await?;

    let (extracted_data, status, error_message) = match state
        .extractor
        .extract(&file.content_type, &file.file_name, file.bytes.clone())
        .await
    {
        Ok(data) => (data, CvStatus::Processed, None),
        Err(e) => {
            warn!("Text extraction failed for '{}': {e}", file.file_name);
            (ExtractedData::default(), CvStatus::Failed, Some(e.to_string()))
        }
    };

    let stored = state
        .storage
        .create_cv(NewCv {
            owner,
            original_file_name: file.file_name,
            file_path: file_path.clone(),
            file_type: file.content_type,
            file_size: file.bytes.len() as i64,
            extracted_data,
            status,
            error_message,
        })
        .await;

    let cv = match stored {
        Ok(cv) => cv,
        Err(e) => {
            // no record points at the file any more
            if let Err(cleanup) = state.files.remove(&file_path).await {
                warn!("Could not remove orphaned upload {file_path}: {cleanup}");
            }
            return Err(e);
        }
    };

    info!("Stored CV {} ({})", cv.id, cv.status.as_str());
    Ok(cv)
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > MAX_CV_BYTES {
                    return Err(file_too_large());
                }
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("firstName") => form.first_name = Some(field.text().await.map_err(multipart_error)?),
            Some("lastName") => form.last_name = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        file_too_large()
    } else {
        AppError::Validation(format!("Invalid upload: {}", error.body_text()))
    }
}

fn file_too_large() -> AppError {
    AppError::Validation("File too large (maximum 5 MB)".to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
