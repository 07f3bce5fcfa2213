//! Admin CRUD for user accounts.

use mongodb::{bson::doc, options::FindOptions};
use rocket::{
    futures::TryStreamExt,
    response::status::{Created, NoContent},
    serde::json::Json,
    Route, State,
};
use validator::Validate;

use crate::{
    cache::Caches,
    error::{Error, Result},
    model::{
        api::{UserDesc, UserSpec},
        auth::{Admin, AuthToken},
        db::{self, User, UserId},
        mongodb::{id_filter, Coll, Counter, MongoCollection},
    },
    rules::{assure_id_consistent, check_new},
};

pub fn routes() -> Vec<Route> {
    routes![
        get_users,
        get_user,
        get_user_by_email,
        create_user,
        update_user,
        delete_user,
        enable_user,
    ]
}

#[get("/api/admin/users")]
async fn get_users(
    _token: AuthToken<Admin>,
    caches: &State<Caches>,
    users: Coll<User>,
) -> Result<Json<Vec<UserDesc>>> {
    let list = match caches.users.get(&()) {
        Some(list) => list,
        None => {
            let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
            let all: Vec<User> = users.find(None, options).await?.try_collect().await?;
            let list: Vec<UserDesc> = all.into_iter().map(Into::into).collect();
            caches.users.insert((), list.clone());
            list
        }
    };
    Ok(Json(list))
}

#[get("/api/admin/users/<id>")]
async fn get_user(
    _token: AuthToken<Admin>,
    id: UserId,
    users: Coll<User>,
) -> Result<Json<UserDesc>> {
    let user = user_by_id(id, &users).await?;
    Ok(Json(user.into()))
}

#[get("/api/admin/users/by?<email>")]
async fn get_user_by_email(
    _token: AuthToken<Admin>,
    email: String,
    users: Coll<User>,
) -> Result<Json<UserDesc>> {
    let user = users
        .find_one(doc! { "email": email.to_lowercase() }, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("User with email={email}")))?;
    Ok(Json(user.into()))
}

#[post("/api/admin/users", data = "<spec>", format = "json")]
async fn create_user(
    _token: AuthToken<Admin>,
    spec: Json<UserSpec>,
    caches: &State<Caches>,
    users: Coll<User>,
    counters: Coll<Counter>,
) -> Result<Created<Json<UserDesc>>> {
    let spec = spec.0;
    spec.validate()?;
    check_new(&spec, "User")?;

    let id = Counter::next_id(&counters, User::NAME).await?;
    let user = spec.into_user(id)?;
    // Duplicate email surfaces as 422.
    users.insert_one(&user, None).await?;

    caches.evict_users();

    let location = format!("/api/admin/users/{id}");
    Ok(Created::new(location).body(Json(user.into())))
}

#[put("/api/admin/users/<id>", data = "<spec>", format = "json")]
async fn update_user(
    _token: AuthToken<Admin>,
    id: UserId,
    spec: Json<UserSpec>,
    caches: &State<Caches>,
    users: Coll<User>,
) -> Result<NoContent> {
    let mut spec = spec.0;
    spec.validate()?;
    assure_id_consistent(&mut spec, id, "User")?;

    user_by_id(id, &users).await?;

    let mut fields = doc! {
        "name": &spec.name,
        "email": spec.email.to_lowercase(),
        "admin": spec.admin,
    };
    // An absent password means "keep the current one".
    if let Some(ref password) = spec.password {
        fields.insert("password_hash", db::hash_password(password));
    }
    users
        .update_one(id_filter(id), doc! { "$set": fields }, None)
        .await?;

    caches.evict_users();
    Ok(NoContent)
}

#[delete("/api/admin/users/<id>")]
async fn delete_user(
    _token: AuthToken<Admin>,
    id: UserId,
    caches: &State<Caches>,
    users: Coll<User>,
) -> Result<NoContent> {
    let deleted = users.delete_one(id_filter(id), None).await?;
    if deleted.deleted_count == 0 {
        return Err(Error::not_found(format!("User with id={id}")));
    }

    caches.evict_users();
    Ok(NoContent)
}

#[patch("/api/admin/users/<id>?<enabled>")]
async fn enable_user(
    _token: AuthToken<Admin>,
    id: UserId,
    enabled: bool,
    caches: &State<Caches>,
    users: Coll<User>,
) -> Result<NoContent> {
    let updated = users
        .update_one(id_filter(id), doc! { "$set": { "enabled": enabled } }, None)
        .await?;
    if updated.matched_count == 0 {
        return Err(Error::not_found(format!("User with id={id}")));
    }

    caches.evict_users();
    Ok(NoContent)
}

async fn user_by_id(id: UserId, users: &Coll<User>) -> Result<User> {
    users
        .find_one(id_filter(id), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("User with id={id}")))
}
