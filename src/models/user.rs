use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Public user shape returned by the API. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full user row as stored, including the password hash. Used only by the
/// credential-checking paths; converted to `User` before anything is
/// serialized.
#[derive(Debug, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Partial update for a user's own profile. Absent fields are left unchanged;
/// a provided password is re-hashed before storage.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_update_request_validation() {
        let empty_update = UpdateUserRequest {
            name: None,
            email: None,
            password: None,
        };
        assert!(empty_update.validate().is_ok());

        let valid_update = UpdateUserRequest {
            name: Some("New Name".to_string()),
            email: Some("new@example.com".to_string()),
            password: Some("longenough123".to_string()),
        };
        assert!(valid_update.validate().is_ok());

        let bad_email = UpdateUserRequest {
            name: None,
            email: Some("nope".to_string()),
            password: None,
        };
        assert!(bad_email.validate().is_err());

        let short_password = UpdateUserRequest {
            name: None,
            email: None,
            password: Some("short".to_string()),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_record_to_public_drops_hash() {
        let record = UserRecord {
            id: 1,
            name: "Alex Rivera".to_string(),
            email: "alex@example.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let user: User = record.into();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "alex@example.com");
    }
}
