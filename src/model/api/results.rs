use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::db::{Restaurant, RestaurantId, Vote};

/// Aggregated vote count for one restaurant: the count exposed at top
/// level plus a per-date history map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResult {
    pub id: RestaurantId,
    pub name: String,
    pub location: String,
    pub votes: u64,
    pub votes_history: BTreeMap<NaiveDate, u64>,
}

impl RestaurantResult {
    fn new(restaurant: &Restaurant, votes: u64, votes_history: BTreeMap<NaiveDate, u64>) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name.clone(),
            location: restaurant.location.clone(),
            votes,
            votes_history,
        }
    }

    /// Aggregate a single day's votes: count per restaurant, with a
    /// one-entry history map keyed by that day. Output order is
    /// unspecified; consumers may re-sort.
    pub fn today_results(
        votes: &[Vote],
        restaurants: &HashMap<RestaurantId, Restaurant>,
        today: NaiveDate,
    ) -> Vec<Self> {
        let mut counts: HashMap<RestaurantId, u64> = HashMap::new();
        for vote in votes {
            *counts.entry(vote.restaurant_id).or_default() += 1;
        }

        counts
            .into_iter()
            // A vote can only outlive its restaurant mid-cascade; skip it.
            .filter_map(|(restaurant_id, count)| {
                let restaurant = restaurants.get(&restaurant_id)?;
                let history = BTreeMap::from([(today, count)]);
                Some(Self::new(restaurant, count, history))
            })
            .collect()
    }

    /// Aggregate votes across dates: per restaurant, a per-date count map.
    /// The top-level count is specifically today's entry of that map,
    /// 0 when the restaurant has history but no votes today.
    pub fn history_results(
        votes: &[Vote],
        restaurants: &HashMap<RestaurantId, Restaurant>,
        today: NaiveDate,
    ) -> Vec<Self> {
        let mut history: HashMap<RestaurantId, BTreeMap<NaiveDate, u64>> = HashMap::new();
        for vote in votes {
            *history
                .entry(vote.restaurant_id)
                .or_default()
                .entry(vote.reg_date)
                .or_default() += 1;
        }

        history
            .into_iter()
            .filter_map(|(restaurant_id, by_date)| {
                let restaurant = restaurants.get(&restaurant_id)?;
                let today_count = by_date.get(&today).copied().unwrap_or(0);
                Some(Self::new(restaurant, today_count, by_date))
            })
            .collect()
    }
}
