use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(skip_serializing)]
    pub password: String, // Argon2 hash, not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Field-wise partial update. `None` leaves the column untouched. The
/// password, when present, already holds the hashed form.
#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    /// Pure application of the patch to an entity. Timestamps are left
    /// alone here; the store refreshes `updated_at` on write.
    pub fn apply(&self, mut user: User) -> User {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(surname) = &self.surname {
            user.surname = surname.clone();
        }
        if let Some(password) = &self.password {
            user.password = password.clone();
        }
        user
    }
}
