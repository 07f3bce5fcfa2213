use chrono::{DateTime, Utc};
use mongodb::error::{Error as DbError, ErrorKind, WriteFailure};
use rocket::{http::Status, response::Responder, serde::json::Json};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, Error>;

/// Map from violated unique-index name to the message reported to clients.
/// Unmatched duplicate violations fall through to a generic message.
const DUPLICATE_MESSAGES: [(&str, &str); 5] = [
    (
        "vote_unique_reg_date_user_id_idx",
        "Vote for today already exists",
    ),
    (
        "restaurant_unique_name_location_idx",
        "Restaurant with this name and location already exists",
    ),
    (
        "dish_unique_name_restaurant_idx",
        "Dish with this name and price already exists for this restaurant",
    ),
    (
        "menu_unique_for_date_restaurant_id_idx",
        "Menu for this date already exists for this restaurant",
    ),
    ("user_unique_email_idx", "User with this email already exists"),
];

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(DbError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Too late: {0}")]
    LateVote(String),
    #[error("Illegal request data: {0}")]
    IllegalRequestData(String),
    #[error("Duplicate: {0}")]
    Duplicate(String),
    #[error("Removal order: {0}")]
    RemovalOrder(String),
    #[error("Invalid data: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn late(why: impl Into<String>) -> Self {
        Self::LateVote(why.into())
    }

    pub fn illegal(why: impl Into<String>) -> Self {
        Self::IllegalRequestData(why.into())
    }

    pub fn unauthorized(why: impl Into<String>) -> Self {
        Self::Unauthorized(why.into())
    }

    /// The single outward status code for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) => Status::InternalServerError,
            Self::NotFound(_) => Status::UnprocessableEntity,
            Self::LateVote(_) => Status::Locked,
            Self::IllegalRequestData(_) => Status::BadRequest,
            Self::Duplicate(_) => Status::UnprocessableEntity,
            Self::RemovalOrder(_) => Status::UnprocessableEntity,
            Self::Validation(_) => Status::UnprocessableEntity,
            Self::Unauthorized(_) => Status::Unauthorized,
            Self::Internal(_) => Status::InternalServerError,
        }
    }
}

/// Return the duplicate-key message of the given write error, if it is one.
fn duplicate_message(err: &DbError) -> Option<String> {
    const DUPLICATE_KEY: i32 = 11000;

    if let ErrorKind::Write(WriteFailure::WriteError(ref write_err)) = *err.kind {
        if write_err.code == DUPLICATE_KEY {
            return Some(translate_duplicate(&write_err.message).to_string());
        }
    }
    None
}

/// Select the client-facing message for a duplicate-key violation by the
/// index name embedded in the raw database message.
fn translate_duplicate(raw: &str) -> &'static str {
    let lowered = raw.to_lowercase();
    for (index_name, message) in DUPLICATE_MESSAGES {
        if lowered.contains(index_name) {
            return message;
        }
    }
    "Duplicate data"
}

impl From<DbError> for Error {
    fn from(err: DbError) -> Self {
        match duplicate_message(&err) {
            Some(message) => Self::Duplicate(message),
            None => Self::Db(err),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let detail = field_errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|msg| msg.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{field}] {detail}")
            })
            .collect();
        // Deterministic order regardless of hash-map iteration.
        fields.sort();
        Self::Validation(fields.join("\n"))
    }
}

/// Structured body attached to every error response.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ErrorInfo {
    fn new(status: Status, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.code,
            error: status.reason_lossy().to_string(),
            message,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.code >= 500 {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        let info = ErrorInfo::new(status, self.to_string());
        (status, Json(info)).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use validator::Validate;

    #[test]
    fn duplicate_translation_matches_index_names() {
        let raw = "E11000 duplicate key error collection: lunchvote.votes \
                   index: vote_unique_reg_date_user_id_idx dup key: { : \"2022-03-14\", : 7 }";
        assert_eq!(translate_duplicate(raw), "Vote for today already exists");

        let raw = "E11000 duplicate key error collection: lunchvote.users \
                   index: user_unique_email_idx dup key: { : \"a@b.c\" }";
        assert_eq!(translate_duplicate(raw), "User with this email already exists");
    }

    #[test]
    fn unknown_index_falls_back_to_generic_message() {
        assert_eq!(
            translate_duplicate("E11000 duplicate key error index: whatever_idx"),
            "Duplicate data"
        );
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            Error::not_found("Restaurant").status(),
            Status::UnprocessableEntity
        );
        assert_eq!(Error::late("cutoff").status(), Status::Locked);
        assert_eq!(Error::illegal("id").status(), Status::BadRequest);
        assert_eq!(
            Error::Duplicate("vote".to_string()).status(),
            Status::UnprocessableEntity
        );
        assert_eq!(
            Error::unauthorized("credentials").status(),
            Status::Unauthorized
        );
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 2, message = "length must be at least 2"))]
        name: String,
        #[validate(range(min = 10, message = "must be at least 10"))]
        price: u32,
    }

    #[test]
    fn validation_failures_aggregate_every_field() {
        let payload = Payload {
            name: "x".to_string(),
            price: 5,
        };
        let err: Error = payload.validate().unwrap_err().into();
        match err {
            Error::Validation(message) => {
                assert!(message.contains("[name] length must be at least 2"));
                assert!(message.contains("[price] must be at least 10"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
