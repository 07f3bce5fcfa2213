//! Admin CRUD for dishes, nested under their owning restaurant.

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
        api::{DishDesc, DishSpec},
        auth::{Admin, AuthToken},
        db::{Dish, DishId, Restaurant, RestaurantId},
        mongodb::{id_filter, restaurant_filter, Coll, Counter, MongoCollection},
    },
    rules::{assure_id_consistent, check_new, check_owner},
};

use super::common::{dish_by_id, restaurant_by_id};

pub fn routes() -> Vec<Route> {
    routes![get_dishes, get_dish, create_dish, update_dish, delete_dish]
}

#[get("/api/admin/restaurants/<restaurant_id>/dishes")]
async fn get_dishes(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    caches: &State<Caches>,
    restaurants: Coll<Restaurant>,
    dishes: Coll<Dish>,
) -> Result<Json<Vec<DishDesc>>> {
    restaurant_by_id(restaurant_id, &restaurants).await?;

    let list = match caches.dishes.get(&restaurant_id) {
        Some(list) => list,
        None => {
            let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
            let list: Vec<Dish> = dishes
                .find(restaurant_filter(restaurant_id), options)
                .await?
                .try_collect()
                .await?;
            caches.dishes.insert(restaurant_id, list.clone());
            list
        }
    };
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

#[get("/api/admin/restaurants/<restaurant_id>/dishes/<id>")]
async fn get_dish(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    id: DishId,
    dishes: Coll<Dish>,
) -> Result<Json<DishDesc>> {
    let dish = dish_by_id(id, &dishes).await?;
    check_owner(dish.restaurant_id, restaurant_id, "Dish")?;
    Ok(Json(dish.into()))
}

#[post(
    "/api/admin/restaurants/<restaurant_id>/dishes",
    data = "<spec>",
    format = "json"
)]
async fn create_dish(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    spec: Json<DishSpec>,
    caches: &State<Caches>,
    restaurants: Coll<Restaurant>,
    dishes: Coll<Dish>,
    counters: Coll<Counter>,
) -> Result<Created<Json<DishDesc>>> {
    let spec = spec.0;
    spec.validate()?;
    check_new(&spec, "Dish")?;
    if let Some(owner) = spec.restaurant_id {
        check_owner(owner, restaurant_id, "Dish")?;
    }
    restaurant_by_id(restaurant_id, &restaurants).await?;

    let id = Counter::next_id(&counters, Dish::NAME).await?;
    let dish = spec.into_dish(id, restaurant_id);
    // Duplicate (name, price, restaurant) surfaces as 422.
    dishes.insert_one(&dish, None).await?;

    caches.evict_dishes();

    let location = format!("/api/admin/restaurants/{restaurant_id}/dishes/{id}");
    Ok(Created::new(location).body(Json(dish.into())))
}

#[put(
    "/api/admin/restaurants/<restaurant_id>/dishes/<id>",
    data = "<spec>",
    format = "json"
)]
async fn update_dish(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    id: DishId,
    spec: Json<DishSpec>,
    caches: &State<Caches>,
    dishes: Coll<Dish>,
) -> Result<NoContent> {
    let mut spec = spec.0;
    spec.validate()?;
    assure_id_consistent(&mut spec, id, "Dish")?;
    if let Some(owner) = spec.restaurant_id {
        check_owner(owner, restaurant_id, "Dish")?;
    }

    let existing = dish_by_id(id, &dishes).await?;
    check_owner(existing.restaurant_id, restaurant_id, "Dish")?;

    let update = doc! {
        "$set": {
            "name": &spec.name,
            "price": spec.price as i64,
        }
    };
    dishes.update_one(id_filter(id), update, None).await?;

    caches.evict_dishes();
    Ok(NoContent)
}

#[delete("/api/admin/restaurants/<restaurant_id>/dishes/<id>")]
async fn delete_dish(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    id: DishId,
    caches: &State<Caches>,
    dishes: Coll<Dish>,
) -> Result<NoContent> {
    let existing = dish_by_id(id, &dishes).await?;
    check_owner(existing.restaurant_id, restaurant_id, "Dish")?;

    dishes.delete_one(id_filter(id), None).await?;

    caches.evict_dishes();
    Ok(NoContent)
}
