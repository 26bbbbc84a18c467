use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo_types::User;

pub const MAX_LIMIT: i64 = 500;

/// Request body for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub surname: String,
    pub password: String,
}

/// Request body for a partial update. Absent fields leave the stored
/// values untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub password: Option<String>,
}

/// Full public view of a user. The password column is not part of it.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Reduced projection returned by the list endpoint.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            surname: user.surname,
        }
    }
}

/// Query parameters for the list endpoint.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl Pagination {
    /// Clamp to the documented bounds: limit in [1, 500], offset >= 0.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_LIMIT), self.offset.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Ada".into(),
            surname: "Lovelace".into(),
            password: "$argon2id$hash".into(),
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-02 00:00 UTC),
        }
    }

    #[test]
    fn user_response_has_no_password_key() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("Lovelace"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn user_response_timestamps_are_rfc3339() {
        let response = UserResponse::from(sample_user());
        let json: serde_json::Value =
            serde_json::to_value(&response).unwrap();
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
        assert_eq!(json["updated_at"], "2024-01-02T00:00:00Z");
    }

    #[test]
    fn summary_projects_id_name_surname_only() {
        let summary = UserSummary::from(sample_user());
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["id", "name", "surname"]);
    }

    #[test]
    fn pagination_defaults_apply() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.clamped(), (100, 0));
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let p = Pagination { limit: 0, offset: -3 };
        assert_eq!(p.clamped(), (1, 0));

        let p = Pagination { limit: 9999, offset: 40 };
        assert_eq!(p.clamped(), (MAX_LIMIT, 40));
    }

    #[test]
    fn update_request_fields_default_to_none() {
        let body: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(body.name.is_none());
        assert!(body.surname.is_none());
        assert!(body.password.is_none());

        let body: UpdateUserRequest =
            serde_json::from_str(r#"{"surname":"Hopper"}"#).unwrap();
        assert!(body.name.is_none());
        assert_eq!(body.surname.as_deref(), Some("Hopper"));
    }
}
