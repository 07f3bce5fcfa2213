//! Admin CRUD for menus. A menu carries 2 to 5 dishes of its restaurant
//! and becomes immutable once its date has passed.

use mongodb::{bson::doc, options::FindOptions, Client, ClientSession};
use rocket::{
    futures::TryStreamExt,
    response::status::{Created, NoContent},
    serde::json::Json,
    Route, State,
};

use crate::{
    clock::Clock,
    error::{Error, Result},
    model::{
        api::{DateRange, MenuDesc, MenuParams},
        auth::{Admin, AuthToken},
        db::{Dish, DishId, Menu, MenuId, Restaurant, RestaurantId},
        mongodb::{bson_date, id_filter, Coll, Counter, MongoCollection},
    },
    rules::{check_current_date, check_owner},
};

use super::common::{menu_by_id, restaurant_by_id};

pub fn routes() -> Vec<Route> {
    routes![
        create_menu,
        get_menu,
        todays_menu,
        get_menus,
        replace_menu_dishes,
        delete_menu,
    ]
}

const MIN_DISHES: usize = 2;
const MAX_DISHES: usize = 5;

fn check_dish_count(dish_ids: &[DishId]) -> Result<()> {
    if (MIN_DISHES..=MAX_DISHES).contains(&dish_ids.len()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "[dishes] size must be between {MIN_DISHES} and {MAX_DISHES}"
        )))
    }
}

/// Verify that every referenced dish exists and belongs to the restaurant.
async fn check_menu_dishes(
    dish_ids: &[DishId],
    restaurant_id: RestaurantId,
    dishes: &Coll<Dish>,
) -> Result<()> {
    for &dish_id in dish_ids {
        let dish = dishes
            .find_one(id_filter(dish_id), None)
            .await?
            .ok_or_else(|| Error::not_found(format!("Dish with id={dish_id}")))?;
        check_owner(dish.restaurant_id, restaurant_id, "Dish")?;
    }
    Ok(())
}

#[post("/api/admin/restaurants/<restaurant_id>/menu?<params..>")]
async fn create_menu(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    params: MenuParams,
    clock: &State<Clock>,
    menus: Coll<Menu>,
    restaurants: Coll<Restaurant>,
    dishes: Coll<Dish>,
    counters: Coll<Counter>,
) -> Result<Created<Json<MenuDesc>>> {
    check_dish_count(&params.dishes)?;
    let for_date = match params.for_date {
        Some(date) => {
            check_current_date(clock, *date)?;
            *date
        }
        None => clock.today(),
    };

    let restaurant = restaurant_by_id(restaurant_id, &restaurants).await?;
    check_menu_dishes(&params.dishes, restaurant.id, &dishes).await?;

    let id = Counter::next_id(&counters, Menu::NAME).await?;
    let menu = Menu {
        id,
        for_date,
        restaurant_id: restaurant.id,
        dish_ids: params.dishes,
    };
    // Duplicate (for_date, restaurant) surfaces as 422.
    menus.insert_one(&menu, None).await?;

    let location = format!("/api/admin/restaurants/{restaurant_id}/menu/{id}");
    Ok(Created::new(location).body(Json(menu.into())))
}

#[get("/api/admin/restaurants/<restaurant_id>/menu/<id>")]
async fn get_menu(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    id: MenuId,
    menus: Coll<Menu>,
) -> Result<Json<MenuDesc>> {
    let menu = menu_by_id(id, &menus).await?;
    check_owner(menu.restaurant_id, restaurant_id, "Menu")?;
    Ok(Json(menu.into()))
}

#[get("/api/admin/restaurants/<restaurant_id>/menu/by")]
async fn todays_menu(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    clock: &State<Clock>,
    menus: Coll<Menu>,
) -> Result<Json<MenuDesc>> {
    let filter = doc! {
        "for_date": bson_date(clock.today()),
        "restaurant_id": restaurant_id as i64,
    };
    let menu = menus.find_one(filter, None).await?.ok_or_else(|| {
        Error::not_found(format!("Menu of restaurant id={restaurant_id} for today"))
    })?;
    Ok(Json(menu.into()))
}

#[get("/api/admin/restaurants/<restaurant_id>/menu?<range..>")]
async fn get_menus(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    range: DateRange,
    menus: Coll<Menu>,
) -> Result<Json<Vec<MenuDesc>>> {
    let filter = doc! {
        "restaurant_id": restaurant_id as i64,
        "for_date": {
            "$gte": bson_date(range.start()),
            "$lte": bson_date(range.end()),
        },
    };
    let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let list: Vec<Menu> = menus.find(filter, options).await?.try_collect().await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

#[patch("/api/admin/restaurants/<restaurant_id>/menu/<id>?<dishes>")]
async fn replace_menu_dishes(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    id: MenuId,
    dishes: Vec<DishId>,
    clock: &State<Clock>,
    client: &State<Client>,
    menus: Coll<Menu>,
    dish_coll: Coll<Dish>,
) -> Result<NoContent> {
    check_dish_count(&dishes)?;

    let menu = menu_by_id(id, &menus).await?;
    check_current_date(clock, menu.for_date)?;
    check_owner(menu.restaurant_id, restaurant_id, "Menu")?;

    // Dish verification and replacement form one unit of work.
    let mut session = client.start_session(None).await?;
    session.start_transaction(None).await?;
    match replace_dishes(id, &dishes, restaurant_id, &menus, &dish_coll, &mut session).await {
        Ok(()) => session.commit_transaction().await?,
        Err(err) => {
            session.abort_transaction().await?;
            return Err(err);
        }
    }
    Ok(NoContent)
}

async fn replace_dishes(
    menu_id: MenuId,
    dish_ids: &[DishId],
    restaurant_id: RestaurantId,
    menus: &Coll<Menu>,
    dishes: &Coll<Dish>,
    session: &mut ClientSession,
) -> Result<()> {
    for &dish_id in dish_ids {
        let dish = dishes
            .find_one_with_session(id_filter(dish_id), None, session)
            .await?
            .ok_or_else(|| Error::not_found(format!("Dish with id={dish_id}")))?;
        check_owner(dish.restaurant_id, restaurant_id, "Dish")?;
    }

    let id_list: Vec<i64> = dish_ids.iter().map(|&id| id as i64).collect();
    let update = doc! { "$set": { "dish_ids": id_list } };
    let updated = menus
        .update_one_with_session(id_filter(menu_id), update, None, session)
        .await?;
    if updated.matched_count == 0 {
        return Err(Error::not_found(format!("Menu with id={menu_id}")));
    }
    Ok(())
}

#[delete("/api/admin/restaurants/<restaurant_id>/menu/<id>")]
async fn delete_menu(
    _token: AuthToken<Admin>,
    restaurant_id: RestaurantId,
    id: MenuId,
    menus: Coll<Menu>,
) -> Result<NoContent> {
    let menu = menu_by_id(id, &menus).await?;
    check_owner(menu.restaurant_id, restaurant_id, "Menu")?;

    menus.delete_one(id_filter(id), None).await?;
    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dish_count_bounds_are_inclusive() {
        assert!(check_dish_count(&[1]).is_err());
        assert!(check_dish_count(&[1, 2]).is_ok());
        assert!(check_dish_count(&[1, 2, 3, 4, 5]).is_ok());
        assert!(check_dish_count(&[1, 2, 3, 4, 5, 6]).is_err());
    }
}
