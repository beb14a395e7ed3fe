//! Where uploaded CV files are kept.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::errors::AppError;

/// Authenticated uploads and anonymous ones are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadScope {
    User,
    Public,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persists `bytes` under a fresh unique name and returns the stored path.
    async fn save(
        &self,
        scope: UploadScope,
        original_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, AppError>;

    /// Deletes a file previously returned by [`FileStore::save`].
    async fn remove(&self, path: &str) -> Result<(), AppError>;
}

/// `<unix-millis>-<random>` plus the original extension, if any.
pub fn unique_file_name(original_name: &str) -> String {
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    let stem = format!("{}-{suffix}", Utc::now().timestamp_millis());
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dir_for(&self, scope: UploadScope) -> PathBuf {
        match scope {
            UploadScope::User => self.root.clone(),
            UploadScope::Public => self.root.join("public"),
        }
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(
        &self,
        scope: UploadScope,
        original_name: &str,
        _content_type: &str,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let dir = self.dir_for(scope);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", dir.display())))?;

        let path = dir.join(unique_file_name(original_name));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Storage(format!("cannot write {}: {e}", path.display())))?;

        info!("Stored upload at {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| AppError::Storage(format!("cannot remove {path}: {e}")))
    }
}

pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// The object key behind an `s3://<bucket>/<key>` path from this store.
    fn object_key<'a>(&self, path: &'a str) -> Result<&'a str, AppError> {
        path.strip_prefix("s3://")
            .and_then(|rest| rest.strip_prefix(self.bucket.as_str()))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Internal(anyhow!("'{path}' is not an object in bucket {}", self.bucket))
            })
    }
}

fn s3_key(scope: UploadScope, file_name: &str) -> String {
    match scope {
        UploadScope::User => format!("cvs/{file_name}"),
        UploadScope::Public => format!("cvs/public/{file_name}"),
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn save(
        &self,
        scope: UploadScope,
        original_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, AppError> {
        let key = s3_key(scope, &unique_file_name(original_name));
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded CV to s3://{}/{}", self.bucket, key);
        Ok(format!("s3://{}/{}", self.bucket, key))
    }

    async fn remove(&self, path: &str) -> Result<(), AppError> {
        let key = self.object_key(path)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;
        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name_keeps_extension() {
        let name = unique_file_name("Mario Rossi CV.pdf");
        assert!(name.ends_with(".pdf"));
        let (millis, rest) = name.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(rest.trim_end_matches(".pdf").parse::<u32>().is_ok());

        assert!(!unique_file_name("README").contains('.'));
    }

    #[test]
    fn test_s3_keys_are_scoped() {
        assert_eq!(s3_key(UploadScope::User, "1-2.pdf"), "cvs/1-2.pdf");
        assert_eq!(s3_key(UploadScope::Public, "1-2.pdf"), "cvs/public/1-2.pdf");
    }

    fn offline_s3_store() -> S3FileStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        S3FileStore::new(aws_sdk_s3::Client::from_conf(config), "talent-cvs")
    }

    #[test]
    fn test_s3_object_key_must_belong_to_bucket() {
        let store = offline_s3_store();
        assert_eq!(
            store.object_key("s3://talent-cvs/cvs/public/1-2.pdf").unwrap(),
            "cvs/public/1-2.pdf"
        );
        for path in ["s3://other-bucket/cvs/1.pdf", "uploads/1.pdf", "s3://talent-cvs/"] {
            assert!(matches!(store.object_key(path), Err(AppError::Internal(_))), "{path}");
        }
    }

    #[tokio::test]
    async fn test_local_store_removes_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        let path = store
            .save(UploadScope::User, "cv.pdf", "application/pdf", Bytes::from_static(b"pdf"))
            .await
            .unwrap();

        store.remove(&path).await.unwrap();
        assert!(!Path::new(&path).exists());
        assert!(matches!(store.remove(&path).await, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_local_store_writes_scoped_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let user_path = store
            .save(UploadScope::User, "cv.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        let public_path = store
            .save(UploadScope::Public, "cv.pdf", "application/pdf", Bytes::from_static(b"pdf"))
            .await
            .unwrap();

        assert_eq!(Path::new(&user_path).parent(), Some(dir.path()));
        assert_eq!(
            Path::new(&public_path).parent(),
            Some(dir.path().join("public").as_path())
        );
        assert_eq!(tokio::fs::read(&public_path).await.unwrap(), b"pdf");
    }
}
