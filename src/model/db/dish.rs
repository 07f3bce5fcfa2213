use serde::{Deserialize, Serialize};

use super::{DishId, RestaurantId};

/// A dish offered by exactly one restaurant.
/// Prices are whole currency units, never below 10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    #[serde(rename = "_id")]
    pub id: DishId,
    pub name: String,
    pub price: u32,
    pub restaurant_id: RestaurantId,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Dish {
        pub fn example() -> Self {
            Self {
                id: 1,
                name: "Borscht".to_string(),
                price: 250,
                restaurant_id: 1,
            }
        }

        pub fn example2() -> Self {
            Self {
                id: 2,
                name: "Pelmeni".to_string(),
                price: 320,
                restaurant_id: 1,
            }
        }
    }
}
