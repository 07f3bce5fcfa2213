use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};
use rocket::{
    request::{self, FromRequest, Request},
    State,
};

use crate::model::db::{Dish, Menu, Restaurant, User, Vote};

use super::counter::Counter;

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A typed handle on one database collection.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `derive(Clone)` would require `T: Clone`, which we don't need.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r, T> FromRequest<'r> for Coll<T>
where
    T: MongoCollection,
{
    type Error = ();

    /// Get the database connection from managed state and wrap it in a
    /// collection. Panics iff the [`Database`] is not managed.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let db = req.guard::<&State<Database>>().await.unwrap();
        request::Outcome::Success(Coll::from_db(db))
    }
}

impl MongoCollection for Restaurant {
    const NAME: &'static str = "restaurants";
}

impl MongoCollection for Dish {
    const NAME: &'static str = "dishes";
}

impl MongoCollection for Menu {
    const NAME: &'static str = "menus";
}

impl MongoCollection for Vote {
    const NAME: &'static str = "votes";
}

impl MongoCollection for User {
    const NAME: &'static str = "users";
}

impl MongoCollection for Counter {
    const NAME: &'static str = "counters";
}

/// Ensure that all the required unique indexes exist on the given database.
///
/// The index names are load-bearing: duplicate-key write errors are
/// translated into client-facing messages by matching them.
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = |name: &str| {
        IndexOptions::builder()
            .unique(true)
            .name(name.to_string())
            .build()
    };

    // At most one vote per user per calendar day; concurrent submissions
    // race here and the storage engine alone decides the winner.
    let vote_index = IndexModel::builder()
        .keys(doc! { "reg_date": 1, "user_id": 1 })
        .options(unique("vote_unique_reg_date_user_id_idx"))
        .build();
    Coll::<Vote>::from_db(db).create_index(vote_index, None).await?;

    let restaurant_index = IndexModel::builder()
        .keys(doc! { "name": 1, "location": 1 })
        .options(unique("restaurant_unique_name_location_idx"))
        .build();
    Coll::<Restaurant>::from_db(db)
        .create_index(restaurant_index, None)
        .await?;

    let dish_index = IndexModel::builder()
        .keys(doc! { "name": 1, "price": 1, "restaurant_id": 1 })
        .options(unique("dish_unique_name_restaurant_idx"))
        .build();
    Coll::<Dish>::from_db(db).create_index(dish_index, None).await?;

    let menu_index = IndexModel::builder()
        .keys(doc! { "for_date": 1, "restaurant_id": 1 })
        .options(unique("menu_unique_for_date_restaurant_id_idx"))
        .build();
    Coll::<Menu>::from_db(db).create_index(menu_index, None).await?;

    let user_index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(unique("user_unique_email_idx"))
        .build();
    Coll::<User>::from_db(db).create_index(user_index, None).await?;

    Ok(())
}
