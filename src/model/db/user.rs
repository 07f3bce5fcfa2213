use chrono::{DateTime, Utc};
use mongodb::Database;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::mongodb::{Coll, Counter, MongoCollection};

use super::UserId;

/// A registered account. Admins manage the catalog; everyone votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub enabled: bool,
    pub admin: bool,
    pub registered: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, name: String, email: String, password: &str, admin: bool) -> Self {
        Self {
            id,
            name,
            email: email.to_lowercase(),
            password_hash: hash_password(password),
            enabled: true,
            admin,
            registered: Utc::now(),
        }
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // A hash we didn't produce fails verification rather than panicking.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap_or(false)
    }
}

pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
        .expect("argon2 parameters are valid")
}

/// Bootstrap credentials used only when the user collection is empty.
const BOOTSTRAP_EMAIL: &str = "admin@localhost";
const BOOTSTRAP_PASSWORD: &str = "admin";

/// Ensure there is at least one admin account to log in with. Idempotent.
pub async fn ensure_admin_exists(db: &Database) -> Result<()> {
    let users = Coll::<User>::from_db(db);
    if users.find_one(None, None).await?.is_some() {
        return Ok(());
    }

    let id = Counter::next_id(&Coll::from_db(db), User::NAME).await?;
    let admin = User::new(
        id,
        "Administrator".to_string(),
        BOOTSTRAP_EMAIL.to_string(),
        BOOTSTRAP_PASSWORD,
        true,
    );
    users.insert_one(&admin, None).await?;
    warn!("Created bootstrap admin '{BOOTSTRAP_EMAIL}'; change its password");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let user = User::example();
        assert!(user.verify_password("lunchtime"));
        assert!(!user.verify_password("dinnertime"));
    }

    #[test]
    fn garbage_hash_fails_verification() {
        let mut user = User::example();
        user.password_hash = "not-a-hash".to_string();
        assert!(!user.verify_password("lunchtime"));
    }

    #[test]
    fn emails_are_lowercased() {
        let user = User::new(3, "Eve".to_string(), "Eve@Example.COM".to_string(), "pw", false);
        assert_eq!(user.email, "eve@example.com");
    }
}
