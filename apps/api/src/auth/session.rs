use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sid";

/// Server-side session table: session id → user id. Lives for the process.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, i32>>>,
}

impl SessionStore {
    pub async fn create(&self, user_id: i32) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.write().await.insert(session_id, user_id);
        session_id
    }

    pub async fn resolve(&self, session_id: Uuid) -> Option<i32> {
        self.sessions.read().await.get(&session_id).copied()
    }

    /// Returns whether a session was removed.
    pub async fn remove(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }
}

pub fn session_cookie(session_id: Uuid) -> String {
    format!("{SESSION_COOKIE}={session_id}; HttpOnly; Path=/; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Finds the `sid` cookie across all `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
