use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, Education, Location};
use crate::models::cv::{CvOwner, CvRecord, CvStatus, ExtractedData, NewCv};
use crate::models::user::{NewUser, User};
use crate::storage::Storage;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: i32,
    name: String,
    current_location: Json<Location>,
    education: Json<Vec<Education>>,
    skills: Json<Vec<String>>,
    role: String,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate {
            id: row.id,
            name: row.name,
            current_location: row.current_location.0,
            education: row.education.0,
            skills: row.skills.0,
            role: row.role,
        }
    }
}

#[derive(Debug, FromRow)]
struct CvRow {
    id: i32,
    user_id: Option<i32>,
    first_name: Option<String>,
    last_name: Option<String>,
    original_file_name: String,
    file_path: String,
    file_type: String,
    file_size: i64,
    extracted_data: Json<ExtractedData>,
    status: String,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CvRow> for CvRecord {
    type Error = AppError;

    fn try_from(row: CvRow) -> Result<Self, Self::Error> {
        let status = CvStatus::parse(&row.status)
            .ok_or_else(|| AppError::Storage(format!("unknown CV status '{}'", row.status)))?;
        Ok(CvRecord {
            id: row.id,
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            original_file_name: row.original_file_name,
            file_path: row.file_path,
            file_type: row.file_type,
            file_size: row.file_size,
            extracted_data: row.extracted_data.0,
            status,
            error_message: row.error_message,
            created_at: row.created_at,
        })
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// PostgreSQL-backed store. Candidate JSON columns mirror the API shape.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts `candidates` when the table is empty and makes sure `user` exists.
    pub async fn bootstrap(&self, candidates: Vec<Candidate>, user: NewUser) -> Result<(), AppError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;

        if existing == 0 {
            let mut tx = self.pool.begin().await?;
            for candidate in &candidates {
                sqlx::query(
                    r#"
                    INSERT INTO candidates (id, name, current_location, education, skills, role)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(candidate.id)
                .bind(&candidate.name)
                .bind(Json(&candidate.current_location))
                .bind(Json(&candidate.education))
                .bind(Json(&candidate.skills))
                .bind(&candidate.role)
                .execute(&mut *tx)
                .await?;
            }
            sqlx::query(
                "SELECT setval(pg_get_serial_sequence('candidates', 'id'), COALESCE(MAX(id), 1)) FROM candidates",
            )
            .execute(&mut *tx)
            .await?;
            tx.commit().await?;
            info!("Seeded {} mock candidates", candidates.len());
        }

        if self.get_user_by_email(&user.email).await?.is_none() {
            self.create_user(user).await?;
            info!("Seeded default user");
        }

        Ok(())
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, full_name, company_name, password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.company_name)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("User with this email or username already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn all_candidates(&self) -> Result<Vec<Candidate>, AppError> {
        let rows = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Candidate::from).collect())
    }

    async fn get_candidate(&self, id: i32) -> Result<Option<Candidate>, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Candidate::from))
    }

    async fn create_cv(&self, cv: NewCv) -> Result<CvRecord, AppError> {
        let (user_id, first_name, last_name) = match &cv.owner {
            CvOwner::User(id) => (Some(*id), None, None),
            CvOwner::Public {
                first_name,
                last_name,
            } => (None, Some(first_name.as_str()), Some(last_name.as_str())),
        };

        let row = sqlx::query_as::<_, CvRow>(
            r#"
            INSERT INTO cvs
                (user_id, first_name, last_name, original_file_name, file_path,
                 file_type, file_size, extracted_data, status, error_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .bind(&cv.original_file_name)
        .bind(&cv.file_path)
        .bind(&cv.file_type)
        .bind(cv.file_size)
        .bind(Json(&cv.extracted_data))
        .bind(cv.status.as_str())
        .bind(&cv.error_message)
        .fetch_one(&self.pool)
        .await?;

        CvRecord::try_from(row)
    }

    async fn get_cv(&self, id: i32) -> Result<Option<CvRecord>, AppError> {
        sqlx::query_as::<_, CvRow>("SELECT * FROM cvs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(CvRecord::try_from)
            .transpose()
    }

    async fn list_cvs_for_user(&self, user_id: i32) -> Result<Vec<CvRecord>, AppError> {
        sqlx::query_as::<_, CvRow>(
            "SELECT * FROM cvs WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(CvRecord::try_from)
        .collect()
    }
}
