use mongodb::bson::doc;
use rocket::{
    http::{Cookie, CookieJar},
    serde::json::Json,
    Route, State,
};

use crate::{
    error::{Error, Result},
    model::{
        api::LoginRequest,
        auth::{AuthToken, AUTH_TOKEN_COOKIE},
        db::User,
        mongodb::Coll,
    },
    Config,
};

pub fn routes() -> Vec<Route> {
    routes![login, logout]
}

#[post("/api/auth/login", data = "<credentials>", format = "json")]
async fn login(
    cookies: &CookieJar<'_>,
    credentials: Json<LoginRequest>,
    users: Coll<User>,
    config: &State<Config>,
) -> Result<()> {
    let with_email = doc! {
        "email": credentials.email.to_lowercase(),
    };

    let user = users
        .find_one(with_email, None)
        .await?
        .filter(|user| user.enabled && user.verify_password(&credentials.password))
        .ok_or_else(|| {
            Error::unauthorized("No enabled account matches the provided email and password")
        })?;

    let token = AuthToken::for_user(&user);
    cookies.add(token.into_cookie(config));

    Ok(())
}

#[post("/api/auth/logout")]
async fn logout(cookies: &CookieJar<'_>) {
    cookies.remove(Cookie::named(AUTH_TOKEN_COOKIE));
}
