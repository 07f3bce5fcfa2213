use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::db::{Dish, DishId, RestaurantId};
use crate::rules::HasId;

/// Inbound dish payload. The owning restaurant comes from the path; a
/// `restaurantId` in the body must agree with it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DishSpec {
    pub id: Option<DishId>,
    #[validate(length(min = 2, max = 100, message = "length must be between 2 and 100"))]
    pub name: String,
    #[validate(range(min = 10, message = "must be at least 10"))]
    pub price: u32,
    pub restaurant_id: Option<RestaurantId>,
}

impl DishSpec {
    pub fn into_dish(self, id: DishId, restaurant_id: RestaurantId) -> Dish {
        Dish {
            id,
            name: self.name,
            price: self.price,
            restaurant_id,
        }
    }
}

impl HasId for DishSpec {
    fn id(&self) -> Option<u32> {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = Some(id);
    }
}

/// Outbound dish representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishDesc {
    pub id: DishId,
    pub name: String,
    pub price: u32,
    pub restaurant_id: RestaurantId,
}

impl From<Dish> for DishDesc {
    fn from(dish: Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name,
            price: dish.price,
            restaurant_id: dish.restaurant_id,
        }
    }
}


/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl DishSpec {
        pub fn example() -> Self {
            Self {
                id: None,
                name: "Borscht".to_string(),
                price: 250,
                restaurant_id: None,
            }
        }
    }
}
