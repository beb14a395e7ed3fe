use serde::Serialize;
use sqlx::FromRow;

/// A stored account. Deliberately not `Serialize`: the password must never
/// reach a response body, so handlers convert to [`PublicUser`] first.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
    /// Plaintext. Login is a mock.
    pub password: String,
}

/// A user as returned by the API (everything but the password).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            company_name: user.company_name,
        }
    }
}

/// Fields required to create a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub company_name: Option<String>,
    pub password: String,
}
