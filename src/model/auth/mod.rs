mod principal;
mod token;

pub use principal::{Admin, Principal, Rights, Voter};
pub use token::{AuthToken, AUTH_TOKEN_COOKIE};
