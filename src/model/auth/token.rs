use std::marker::PhantomData;

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{
    errors::Error as JwtError, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{self, FromRequest},
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::model::db::{User as DbUser, UserId};
use crate::Config;

use super::principal::{Principal, Rights, Voter};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// An authentication token naming a specific account and its rights.
/// The type parameter is the access level a route demands; the guard
/// rejects tokens whose rights don't cover it.
#[derive(Serialize, Deserialize)]
pub struct AuthToken<P> {
    id: UserId,
    #[serde(rename = "rgt")]
    rights: Rights,
    #[serde(skip)]
    phantom: PhantomData<P>,
}

impl AuthToken<Voter> {
    /// Issue a token for the given account with the rights it holds.
    pub fn for_user(user: &DbUser) -> Self {
        Self {
            id: user.id,
            rights: if user.admin {
                Rights::Admin
            } else {
                Rights::Voter
            },
            phantom: PhantomData,
        }
    }
}

impl<P> AuthToken<P> {
    /// The account id this token was issued for.
    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn rights(&self) -> Rights {
        self.rights
    }
}

impl<P> AuthToken<P>
where
    P: Principal,
{
    /// Serialize this token into a signed cookie.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .unwrap(); // Infallible.

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(time::Duration::seconds(config.auth_ttl().num_seconds()))
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize and verify a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'_>, config: &Config) -> Result<Self, JwtError> {
        jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims<P>>| claims.claims.token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims<P> {
    #[serde(flatten, bound = "")]
    token: AuthToken<P>,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r, P> FromRequest<'r> for AuthToken<P>
where
    P: Principal,
{
    type Error = ();

    /// Read the auth cookie and verify it covers this route's access level.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let config = req.guard::<&State<Config>>().await.unwrap(); // `Config` is always managed.

        let Some(cookie) = req.cookies().get(AUTH_TOKEN_COOKIE) else {
            return request::Outcome::Failure((Status::Unauthorized, ()));
        };
        let token = match Self::from_cookie(cookie, config) {
            Ok(token) => token,
            Err(_) => return request::Outcome::Failure((Status::Unauthorized, ())),
        };

        if token.rights.permits(P::RIGHTS) {
            request::Outcome::Success(token)
        } else {
            request::Outcome::Failure((Status::Forbidden, ()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::auth::Admin;
    use crate::model::db::User as DbUser;

    #[test]
    fn cookie_round_trip_preserves_identity() {
        let config = Config::example();
        let user = DbUser::example();

        let token = AuthToken::for_user(&user);
        let cookie = token.into_cookie(&config);

        let decoded = AuthToken::<Voter>::from_cookie(&cookie, &config).unwrap();
        assert_eq!(decoded.id(), user.id);
        assert_eq!(decoded.rights(), Rights::Voter);
    }

    #[test]
    fn admin_accounts_get_admin_rights() {
        let config = Config::example();
        let admin = DbUser::example_admin();

        let cookie = AuthToken::for_user(&admin).into_cookie(&config);
        let decoded = AuthToken::<Admin>::from_cookie(&cookie, &config).unwrap();
        assert_eq!(decoded.rights(), Rights::Admin);
    }

    #[test]
    fn tampered_cookies_are_rejected() {
        let config = Config::example();
        let cookie = AuthToken::for_user(&DbUser::example()).into_cookie(&config);

        let mut forged = cookie.value().to_string();
        forged.pop();
        let forged = Cookie::new(AUTH_TOKEN_COOKIE, forged);
        assert!(AuthToken::<Voter>::from_cookie(&forged, &config).is_err());
    }
}
