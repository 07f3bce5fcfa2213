use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::model::db::{Restaurant, RestaurantId, Vote, VoteId};

/// Query parameters for vote submission and update.
#[derive(Debug, FromForm)]
pub struct VoteParams {
    #[field(name = "restaurantId")]
    pub restaurant_id: RestaurantId,
}

/// A vote as shown to its owner, with the restaurant resolved to
/// name and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDescription {
    pub id: VoteId,
    pub reg_date: NaiveDate,
    pub reg_time: NaiveTime,
    pub restaurant_name: String,
    pub restaurant_location: String,
}

impl VoteDescription {
    pub fn new(vote: &Vote, restaurant: &Restaurant) -> Self {
        Self {
            id: vote.id,
            reg_date: vote.reg_date,
            reg_time: vote.reg_time,
            restaurant_name: restaurant.name.clone(),
            restaurant_location: restaurant.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_resolves_the_restaurant() {
        let restaurant = Restaurant::example();
        let date = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        let vote = Vote::example(date, 7, restaurant.id);

        let desc = VoteDescription::new(&vote, &restaurant);
        assert_eq!(desc.id, vote.id);
        assert_eq!(desc.reg_date, date);
        assert_eq!(desc.restaurant_name, restaurant.name);
        assert_eq!(desc.restaurant_location, restaurant.location);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let desc = VoteDescription::new(
            &Vote::example(NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(), 7, 1),
            &Restaurant::example(),
        );
        let json = serde_json::to_value(&desc).unwrap();
        assert!(json.get("regDate").is_some());
        assert!(json.get("restaurantName").is_some());
        assert!(json.get("restaurantLocation").is_some());
    }
}
