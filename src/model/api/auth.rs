use serde::Deserialize;

/// Credentials presented at login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl LoginRequest {
        pub fn example() -> Self {
            Self {
                email: "alice@example.com".to_string(),
                password: "lunchtime".to_string(),
            }
        }
    }
}
