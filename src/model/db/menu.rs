use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DishId, MenuId, RestaurantId};

/// The dish selection one restaurant offers on one date.
/// References 2 to 5 existing dishes of that restaurant by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(rename = "_id")]
    pub id: MenuId,
    pub for_date: NaiveDate,
    pub restaurant_id: RestaurantId,
    pub dish_ids: Vec<DishId>,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Menu {
        pub fn example(for_date: NaiveDate) -> Self {
            Self {
                id: 1,
                for_date,
                restaurant_id: 1,
                dish_ids: vec![1, 2],
            }
        }
    }
}
