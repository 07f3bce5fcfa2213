//! Bounded, time-expiring read caches with coarse write invalidation.
//!
//! Every read-mostly collection gets its own cache; any mutation of the
//! underlying collection evicts the whole corresponding cache, so a read
//! never sees data staler than the last write. The one per-key eviction is
//! a user's own vote entry. Entries also expire after a period without
//! access, matching the policy of the caches these replace.

use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;

use crate::model::api::{RestaurantResult, UserDesc, VoteDescription};
use crate::model::db::{Dish, Restaurant, RestaurantId, UserId};

pub struct Caches {
    /// The full restaurant list; a single fixed key.
    pub restaurants: Cache<(), Vec<Restaurant>>,
    /// Dish lists keyed by owning restaurant.
    pub dishes: Cache<RestaurantId, Vec<Dish>>,
    /// Today's vote per user.
    pub user_votes: Cache<UserId, VoteDescription>,
    /// Today's aggregate result, keyed by date.
    pub today_results: Cache<NaiveDate, Vec<RestaurantResult>>,
    /// The full user list; a single fixed key.
    pub users: Cache<(), Vec<UserDesc>>,
}

impl Default for Caches {
    fn default() -> Self {
        Self {
            restaurants: bounded(1, Duration::from_secs(300)),
            dishes: bounded(500, Duration::from_secs(300)),
            user_votes: bounded(500, Duration::from_secs(300)),
            today_results: bounded(50, Duration::from_secs(30 * 60)),
            users: bounded(1, Duration::from_secs(60)),
        }
    }
}

fn bounded<K, V>(capacity: u64, idle: Duration) -> Cache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(capacity)
        .time_to_idle(idle)
        .build()
}

impl Caches {
    /// A vote changed: drop the voter's own entry and every aggregate.
    pub fn evict_vote(&self, user_id: UserId) {
        self.user_votes.invalidate(&user_id);
        self.today_results.invalidate_all();
    }

    /// A dish changed: the dish lists can no longer be trusted.
    pub fn evict_dishes(&self) {
        self.dishes.invalidate_all();
    }

    /// A restaurant changed: votes and dishes may have gone with it.
    pub fn evict_restaurant_scope(&self) {
        self.restaurants.invalidate_all();
        self.dishes.invalidate_all();
        self.user_votes.invalidate_all();
        self.today_results.invalidate_all();
    }

    /// A user changed: drop the user list.
    pub fn evict_users(&self) {
        self.users.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::db::Vote;

    fn vote_description(user_id: UserId) -> VoteDescription {
        let date = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        VoteDescription::new(&Vote::example(date, user_id, 1), &Restaurant::example())
    }

    #[test]
    fn vote_eviction_is_per_user() {
        let caches = Caches::default();
        caches.user_votes.insert(1, vote_description(1));
        caches.user_votes.insert(2, vote_description(2));

        caches.evict_vote(1);

        assert!(caches.user_votes.get(&1).is_none());
        assert!(caches.user_votes.get(&2).is_some());
    }

    #[test]
    fn vote_eviction_drops_all_aggregates() {
        let caches = Caches::default();
        let date = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        caches.today_results.insert(date, Vec::new());

        caches.evict_vote(1);
        // Invalidation is immediate from the caller's perspective.
        assert!(caches.today_results.get(&date).is_none());
    }

    #[test]
    fn restaurant_eviction_clears_the_cascade_scope() {
        let caches = Caches::default();
        caches.restaurants.insert((), vec![Restaurant::example()]);
        caches.dishes.insert(1, Vec::new());
        caches.user_votes.insert(1, vote_description(1));
        caches.users.insert((), Vec::new());

        caches.evict_restaurant_scope();

        assert!(caches.restaurants.get(&()).is_none());
        assert!(caches.dishes.get(&1).is_none());
        assert!(caches.user_votes.get(&1).is_none());
        // Users are unaffected by restaurant changes.
        assert!(caches.users.get(&()).is_some());
    }

    #[test]
    fn cache_policies_match_the_configured_bounds() {
        let caches = Caches::default();

        assert_eq!(caches.restaurants.policy().max_capacity(), Some(1));
        assert_eq!(caches.dishes.policy().max_capacity(), Some(500));
        assert_eq!(caches.user_votes.policy().max_capacity(), Some(500));
        assert_eq!(caches.today_results.policy().max_capacity(), Some(50));
        assert_eq!(caches.users.policy().max_capacity(), Some(1));

        assert_eq!(
            caches.restaurants.policy().time_to_idle(),
            Some(Duration::from_secs(300))
        );
        assert_eq!(
            caches.today_results.policy().time_to_idle(),
            Some(Duration::from_secs(30 * 60))
        );
        assert_eq!(
            caches.users.policy().time_to_idle(),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn cached_reads_return_the_inserted_value() {
        let caches = Caches::default();
        let list = vec![Restaurant::example(), Restaurant::example2()];
        caches.restaurants.insert((), list.clone());
        assert_eq!(caches.restaurants.get(&()), Some(list));
    }
}
