//! Admin CRUD for restaurants. Deletion cascades to dishes and votes but
//! refuses while any menu still references the restaurant.

use mongodb::{bson::doc, options::FindOptions, Client, ClientSession};
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
        api::{RestaurantDesc, RestaurantSpec},
        auth::{Admin, AuthToken},
        db::{Dish, Menu, Restaurant, RestaurantId, Vote},
        mongodb::{id_filter, restaurant_filter, Coll, Counter, MongoCollection},
    },
    rules::{assure_id_consistent, check_new},
};

use super::common::restaurant_by_id;

pub fn routes() -> Vec<Route> {
    routes![
        get_restaurants,
        get_restaurant,
        create_restaurant,
        update_restaurant,
        delete_restaurant,
    ]
}

#[get("/api/admin/restaurants")]
async fn get_restaurants(
    _token: AuthToken<Admin>,
    caches: &State<Caches>,
    restaurants: Coll<Restaurant>,
) -> Result<Json<Vec<RestaurantDesc>>> {
    let list = match caches.restaurants.get(&()) {
        Some(list) => list,
        None => {
            let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
            let list: Vec<Restaurant> =
                restaurants.find(None, options).await?.try_collect().await?;
            caches.restaurants.insert((), list.clone());
            list
        }
    };
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

#[get("/api/admin/restaurants/<id>")]
async fn get_restaurant(
    _token: AuthToken<Admin>,
    id: RestaurantId,
    restaurants: Coll<Restaurant>,
) -> Result<Json<RestaurantDesc>> {
    let restaurant = restaurant_by_id(id, &restaurants).await?;
    Ok(Json(restaurant.into()))
}

#[post("/api/admin/restaurants", data = "<spec>", format = "json")]
async fn create_restaurant(
    _token: AuthToken<Admin>,
    spec: Json<RestaurantSpec>,
    caches: &State<Caches>,
    restaurants: Coll<Restaurant>,
    counters: Coll<Counter>,
) -> Result<Created<Json<RestaurantDesc>>> {
    let spec = spec.0;
    spec.validate()?;
    check_new(&spec, "Restaurant")?;

    let id = Counter::next_id(&counters, Restaurant::NAME).await?;
    let restaurant = spec.into_restaurant(id);
    // Duplicate (name, location) surfaces as 422.
    restaurants.insert_one(&restaurant, None).await?;

    caches.evict_restaurant_scope();

    let location = format!("/api/admin/restaurants/{id}");
    Ok(Created::new(location).body(Json(restaurant.into())))
}

#[put("/api/admin/restaurants/<id>", data = "<spec>", format = "json")]
async fn update_restaurant(
    _token: AuthToken<Admin>,
    id: RestaurantId,
    spec: Json<RestaurantSpec>,
    caches: &State<Caches>,
    restaurants: Coll<Restaurant>,
) -> Result<NoContent> {
    let mut spec = spec.0;
    spec.validate()?;
    assure_id_consistent(&mut spec, id, "Restaurant")?;

    let update = doc! {
        "$set": {
            "name": &spec.name,
            "location": &spec.location,
        }
    };
    let updated = restaurants.update_one(id_filter(id), update, None).await?;
    if updated.matched_count == 0 {
        return Err(Error::not_found(format!("Restaurant with id={id}")));
    }

    caches.evict_restaurant_scope();
    Ok(NoContent)
}

#[delete("/api/admin/restaurants/<id>")]
async fn delete_restaurant(
    _token: AuthToken<Admin>,
    id: RestaurantId,
    caches: &State<Caches>,
    client: &State<Client>,
    restaurants: Coll<Restaurant>,
    menus: Coll<Menu>,
    dishes: Coll<Dish>,
    votes: Coll<Vote>,
) -> Result<NoContent> {
    // Menus are never cascaded: they must be deleted explicitly first,
    // or menu-dish links would be left dangling.
    let menu_count = menus.count_documents(restaurant_filter(id), None).await?;
    if menu_count > 0 {
        return Err(Error::RemovalOrder(format!(
            "Restaurant {id} still has {menu_count} menu(s); delete them first"
        )));
    }

    let mut session = client.start_session(None).await?;
    session.start_transaction(None).await?;
    match cascade_delete(id, &restaurants, &dishes, &votes, &mut session).await {
        Ok(()) => session.commit_transaction().await?,
        Err(err) => {
            session.abort_transaction().await?;
            return Err(err);
        }
    }

    caches.evict_restaurant_scope();
    Ok(NoContent)
}

/// Delete a restaurant together with its dishes and votes.
async fn cascade_delete(
    id: RestaurantId,
    restaurants: &Coll<Restaurant>,
    dishes: &Coll<Dish>,
    votes: &Coll<Vote>,
    session: &mut ClientSession,
) -> Result<()> {
    dishes
        .delete_many_with_session(restaurant_filter(id), None, session)
        .await?;
    votes
        .delete_many_with_session(restaurant_filter(id), None, session)
        .await?;
    let deleted = restaurants
        .delete_one_with_session(id_filter(id), None, session)
        .await?;
    if deleted.deleted_count == 0 {
        return Err(Error::not_found(format!("Restaurant with id={id}")));
    }
    Ok(())
}
