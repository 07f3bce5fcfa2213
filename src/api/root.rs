//! Voter-facing endpoints: today's menus, vote submission and update,
//! the caller's own vote, and the aggregated results.

use mongodb::{
    bson::doc,
    options::FindOptions,
};
use rocket::{
    futures::TryStreamExt,
    response::status::{Created, NoContent},
    serde::json::Json,
    Route, State,
};

use crate::{
    cache::Caches,
    clock::Clock,
    error::{Error, Result},
    model::{
        api::{DateRange, MenuSummary, Pagination, RestaurantResult, VoteDescription, VoteParams},
        auth::{AuthToken, Voter},
        db::{truncate_to_seconds, Dish, Menu, Restaurant, Vote},
        mongodb::{bson_date, bson_time, id_filter, Coll, Counter, MongoCollection},
    },
    rules::check_current_time,
    Config,
};

use super::common::{dishes_by_ids, restaurant_by_id, restaurant_lookup};

pub fn routes() -> Vec<Route> {
    routes![
        today_menus,
        create_vote,
        update_vote,
        my_vote,
        my_vote_history,
        today_result,
        result_history,
    ]
}

#[get("/api/root")]
async fn today_menus(
    _token: AuthToken<Voter>,
    pagination: Pagination,
    clock: &State<Clock>,
    menus: Coll<Menu>,
    restaurants: Coll<Restaurant>,
    dishes: Coll<Dish>,
) -> Result<Json<Vec<MenuSummary>>> {
    let options = FindOptions::builder()
        .sort(doc! { "_id": 1 })
        .skip(pagination.skip())
        .limit(pagination.page_size() as i64)
        .build();
    let todays_menus: Vec<Menu> = menus
        .find(doc! { "for_date": bson_date(clock.today()) }, options)
        .await?
        .try_collect()
        .await?;

    let mut summaries = Vec::with_capacity(todays_menus.len());
    for menu in todays_menus {
        let restaurant = restaurant_by_id(menu.restaurant_id, &restaurants).await?;
        let menu_dishes = dishes_by_ids(&menu.dish_ids, &dishes).await?;
        summaries.push(MenuSummary::project(&restaurant, &menu_dishes));
    }
    Ok(Json(summaries))
}

#[post("/api/root/vote?<params..>")]
async fn create_vote(
    token: AuthToken<Voter>,
    params: VoteParams,
    clock: &State<Clock>,
    config: &State<Config>,
    caches: &State<Caches>,
    votes: Coll<Vote>,
    restaurants: Coll<Restaurant>,
    counters: Coll<Counter>,
) -> Result<Created<Json<VoteDescription>>> {
    check_current_time(clock, config.vote_end())?;
    let restaurant = restaurant_by_id(params.restaurant_id, &restaurants).await?;

    let id = Counter::next_id(&counters, Vote::NAME).await?;
    let vote = Vote::new(id, clock.today(), clock.time(), token.id(), restaurant.id);
    // No pre-check: the unique (reg_date, user_id) index decides between
    // concurrent submissions and a duplicate surfaces as 422.
    votes.insert_one(&vote, None).await?;

    caches.evict_vote(token.id());

    Ok(Created::new("/api/root/vote/by".to_string())
        .body(Json(VoteDescription::new(&vote, &restaurant))))
}

#[put("/api/root/vote?<params..>")]
async fn update_vote(
    token: AuthToken<Voter>,
    params: VoteParams,
    clock: &State<Clock>,
    config: &State<Config>,
    caches: &State<Caches>,
    votes: Coll<Vote>,
    restaurants: Coll<Restaurant>,
    counters: Coll<Counter>,
) -> Result<NoContent> {
    check_current_time(clock, config.vote_end())?;
    let restaurant = restaurant_by_id(params.restaurant_id, &restaurants).await?;

    let todays_filter = doc! {
        "reg_date": bson_date(clock.today()),
        "user_id": token.id() as i64,
    };
    match votes.find_one(todays_filter, None).await? {
        // Change of mind: overwrite restaurant and time, keep id and date.
        Some(vote) => {
            let update = doc! {
                "$set": {
                    "restaurant_id": restaurant.id as i64,
                    "reg_time": bson_time(truncate_to_seconds(clock.time())),
                }
            };
            votes.update_one(id_filter(vote.id), update, None).await?;
        }
        // First vote of the day: fall back to creation.
        None => {
            let id = Counter::next_id(&counters, Vote::NAME).await?;
            let vote = Vote::new(id, clock.today(), clock.time(), token.id(), restaurant.id);
            votes.insert_one(&vote, None).await?;
        }
    }

    caches.evict_vote(token.id());
    Ok(NoContent)
}

#[get("/api/root/vote/by")]
async fn my_vote(
    token: AuthToken<Voter>,
    clock: &State<Clock>,
    caches: &State<Caches>,
    votes: Coll<Vote>,
    restaurants: Coll<Restaurant>,
) -> Result<Json<VoteDescription>> {
    if let Some(description) = caches.user_votes.get(&token.id()) {
        return Ok(Json(description));
    }

    let todays_filter = doc! {
        "reg_date": bson_date(clock.today()),
        "user_id": token.id() as i64,
    };
    let vote = votes
        .find_one(todays_filter, None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Vote of user id={} for today", token.id())))?;
    let restaurant = restaurant_by_id(vote.restaurant_id, &restaurants).await?;

    let description = VoteDescription::new(&vote, &restaurant);
    caches.user_votes.insert(token.id(), description.clone());
    Ok(Json(description))
}

#[get("/api/root/vote/user/history?<range..>")]
async fn my_vote_history(
    token: AuthToken<Voter>,
    range: DateRange,
    votes: Coll<Vote>,
    restaurants: Coll<Restaurant>,
) -> Result<Json<Vec<VoteDescription>>> {
    let filter = doc! {
        "user_id": token.id() as i64,
        "reg_date": {
            "$gte": bson_date(range.start()),
            "$lte": bson_date(range.end()),
        },
    };
    let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
    let user_votes: Vec<Vote> = votes.find(filter, options).await?.try_collect().await?;

    let lookup = restaurant_lookup(&restaurants).await?;
    let descriptions = user_votes
        .iter()
        .filter_map(|vote| {
            lookup
                .get(&vote.restaurant_id)
                .map(|restaurant| VoteDescription::new(vote, restaurant))
        })
        .collect();
    Ok(Json(descriptions))
}

#[get("/api/root/vote/result")]
async fn today_result(
    _token: AuthToken<Voter>,
    clock: &State<Clock>,
    caches: &State<Caches>,
    votes: Coll<Vote>,
    restaurants: Coll<Restaurant>,
) -> Result<Json<Vec<RestaurantResult>>> {
    let today = clock.today();
    if let Some(results) = caches.today_results.get(&today) {
        return Ok(Json(results));
    }

    let todays_votes: Vec<Vote> = votes
        .find(doc! { "reg_date": bson_date(today) }, None)
        .await?
        .try_collect()
        .await?;
    let lookup = restaurant_lookup(&restaurants).await?;

    let results = RestaurantResult::today_results(&todays_votes, &lookup, today);
    caches.today_results.insert(today, results.clone());
    Ok(Json(results))
}

#[get("/api/root/vote/result/history?<range..>")]
async fn result_history(
    _token: AuthToken<Voter>,
    range: DateRange,
    clock: &State<Clock>,
    votes: Coll<Vote>,
    restaurants: Coll<Restaurant>,
) -> Result<Json<Vec<RestaurantResult>>> {
    let filter = doc! {
        "reg_date": {
            "$gte": bson_date(range.start()),
            "$lte": bson_date(range.end()),
        },
    };
    let range_votes: Vec<Vote> = votes.find(filter, None).await?.try_collect().await?;
    let lookup = restaurant_lookup(&restaurants).await?;

    Ok(Json(RestaurantResult::history_results(
        &range_votes,
        &lookup,
        clock.today(),
    )))
}
