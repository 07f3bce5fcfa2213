use std::collections::HashMap;

use mongodb::bson::doc;
use rocket::futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::model::db::{Dish, DishId, Menu, MenuId, Restaurant, RestaurantId};
use crate::model::mongodb::{id_filter, Coll};

/// Look up a restaurant or fail with the standard not-found error.
pub async fn restaurant_by_id(
    id: RestaurantId,
    restaurants: &Coll<Restaurant>,
) -> Result<Restaurant> {
    restaurants
        .find_one(id_filter(id), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Restaurant with id={id}")))
}

pub async fn dish_by_id(id: DishId, dishes: &Coll<Dish>) -> Result<Dish> {
    dishes
        .find_one(id_filter(id), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Dish with id={id}")))
}

pub async fn menu_by_id(id: MenuId, menus: &Coll<Menu>) -> Result<Menu> {
    menus
        .find_one(id_filter(id), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Menu with id={id}")))
}

/// Fetch the dishes with the given ids, in no particular order.
pub async fn dishes_by_ids(ids: &[DishId], dishes: &Coll<Dish>) -> Result<Vec<Dish>> {
    let id_list: Vec<i64> = ids.iter().map(|&id| id as i64).collect();
    let found = dishes
        .find(doc! { "_id": { "$in": id_list } }, None)
        .await?
        .try_collect()
        .await?;
    Ok(found)
}

/// All restaurants as an id-keyed lookup, for resolving vote references.
pub async fn restaurant_lookup(
    restaurants: &Coll<Restaurant>,
) -> Result<HashMap<RestaurantId, Restaurant>> {
    let all: Vec<Restaurant> = restaurants.find(None, None).await?.try_collect().await?;
    Ok(all
        .into_iter()
        .map(|restaurant| (restaurant.id, restaurant))
        .collect())
}
