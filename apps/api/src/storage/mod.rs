//! Repository seam for candidates, users and CVs.
//!
//! `MemStorage` keeps everything in process memory (rebuilt on restart);
//! `PgStorage` is backed by PostgreSQL. Handlers only see `Arc<dyn Storage>`.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::cv::{CvRecord, NewCv};
use crate::models::user::{NewUser, User};
use crate::talent::query::CandidateFilter;

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemStorage;
pub use postgres::PgStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Exact, case-sensitive lookup.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::Conflict` when the email or username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Every candidate, in store order (ascending id).
    async fn all_candidates(&self) -> Result<Vec<Candidate>, AppError>;

    async fn get_candidate(&self, id: i32) -> Result<Option<Candidate>, AppError>;

    async fn filter_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Candidate>, AppError> {
        Ok(filter.apply(self.all_candidates().await?))
    }

    async fn create_cv(&self, cv: NewCv) -> Result<CvRecord, AppError>;

    async fn get_cv(&self, id: i32) -> Result<Option<CvRecord>, AppError>;

    /// A user's CVs, newest first.
    async fn list_cvs_for_user(&self, user_id: i32) -> Result<Vec<CvRecord>, AppError>;
}

/// The account every fresh store starts with.
pub fn default_user() -> NewUser {
    NewUser {
        username: "admin".to_string(),
        email: "admin@example.com".to_string(),
        full_name: "Admin User".to_string(),
        company_name: Some("HR Solutions Inc".to_string()),
        password: "password123".to_string(),
    }
}
