use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::cv::{CvRecord, NewCv};
use crate::models::user::{NewUser, User};
use crate::storage::Storage;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    candidates: BTreeMap<i32, Candidate>,
    cvs: BTreeMap<i32, CvRecord>,
    next_user_id: i32,
    next_cv_id: i32,
}

impl Tables {
    fn insert_user(&mut self, user: NewUser) -> Result<User, AppError> {
        if self.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        if self.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict(
                "User with this username already exists".to_string(),
            ));
        }
        self.next_user_id += 1;
        let stored = User {
            id: self.next_user_id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            company_name: user.company_name,
            password: user.password,
        };
        self.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

/// Process-lifetime store. Candidates iterate in id order.
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new(candidates: Vec<Candidate>, users: Vec<NewUser>) -> Result<Self, AppError> {
        let mut tables = Tables {
            candidates: candidates.into_iter().map(|c| (c.id, c)).collect(),
            ..Default::default()
        };
        for user in users {
            tables.insert_user(user)?;
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        self.tables.write().await.insert_user(user)
    }

    async fn all_candidates(&self) -> Result<Vec<Candidate>, AppError> {
        Ok(self.tables.read().await.candidates.values().cloned().collect())
    }

    async fn get_candidate(&self, id: i32) -> Result<Option<Candidate>, AppError> {
        Ok(self.tables.read().await.candidates.get(&id).cloned())
    }

    async fn create_cv(&self, cv: NewCv) -> Result<CvRecord, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_cv_id += 1;
        let record = cv.into_record(tables.next_cv_id, Utc::now());
        tables.cvs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_cv(&self, id: i32) -> Result<Option<CvRecord>, AppError> {
        Ok(self.tables.read().await.cvs.get(&id).cloned())
    }

    async fn list_cvs_for_user(&self, user_id: i32) -> Result<Vec<CvRecord>, AppError> {
        let tables = self.tables.read().await;
        // ids grow with insertion, so reverse id order is newest first
        Ok(tables
            .cvs
            .values()
            .rev()
            .filter(|cv| cv.user_id == Some(user_id))
            .cloned()
            .collect())
    }
}
