use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::model::db::{User, UserId};
use crate::rules::HasId;

/// Inbound user payload. The password is required on create and optional
/// on update (absent means "keep the current one").
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UserSpec {
    pub id: Option<UserId>,
    #[validate(length(min = 2, max = 100, message = "length must be between 2 and 100"))]
    pub name: String,
    #[validate(email(message = "must be a well-formed email address"))]
    pub email: String,
    #[validate(length(min = 5, max = 100, message = "length must be between 5 and 100"))]
    pub password: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl UserSpec {
    pub fn into_user(self, id: UserId) -> Result<User> {
        let password = self
            .password
            .ok_or_else(|| Error::illegal("User password must be set"))?;
        Ok(User::new(id, self.name, self.email, &password, self.admin))
    }
}

impl HasId for UserSpec {
    fn id(&self) -> Option<u32> {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = Some(id);
    }
}

/// Outbound user representation. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDesc {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub enabled: bool,
    pub admin: bool,
    pub registered: DateTime<Utc>,
}

impl From<User> for UserDesc {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            enabled: user.enabled,
            admin: user.admin,
            registered: user.registered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_email_and_short_password_are_both_reported() {
        let spec = UserSpec {
            id: None,
            name: "Eve".to_string(),
            email: "not-an-email".to_string(),
            password: Some("pw".to_string()),
            admin: false,
        };
        let err: Error = spec.validate().unwrap_err().into();
        match err {
            Error::Validation(msg) => {
                assert!(msg.contains("[email]"));
                assert!(msg.contains("[password]"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_without_password_is_illegal() {
        let spec = UserSpec {
            id: None,
            name: "Eve".to_string(),
            email: "eve@example.com".to_string(),
            password: None,
            admin: false,
        };
        let err = spec.into_user(3).unwrap_err();
        assert!(matches!(err, Error::IllegalRequestData(_)));
    }

    #[test]
    fn desc_hides_the_password_hash() {
        let json = serde_json::to_value(UserDesc::from(User::example())).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "alice@example.com");
    }
}
