use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{RestaurantId, UserId, VoteId};

/// One user's vote for one restaurant on one calendar day.
/// The `(reg_date, user_id)` unique index enforces at-most-one per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: VoteId,
    pub reg_date: NaiveDate,
    pub reg_time: NaiveTime,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
}

impl Vote {
    /// Create a vote stamped with the given date and time.
    pub fn new(
        id: VoteId,
        reg_date: NaiveDate,
        reg_time: NaiveTime,
        user_id: UserId,
        restaurant_id: RestaurantId,
    ) -> Self {
        Self {
            id,
            reg_date,
            reg_time: truncate_to_seconds(reg_time),
            user_id,
            restaurant_id,
        }
    }
}

/// Registration times are stored at second precision.
pub fn truncate_to_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).expect("zero nanoseconds is valid")
}


/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Vote {
        pub fn example(reg_date: NaiveDate, user_id: u32, restaurant_id: u32) -> Self {
            Self::new(
                user_id, // distinct per user is enough for fixtures
                reg_date,
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                user_id,
                restaurant_id,
            )
        }
    }
}
