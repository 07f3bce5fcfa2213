use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::db::{Restaurant, RestaurantId};
use crate::rules::HasId;

/// Inbound restaurant payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RestaurantSpec {
    pub id: Option<RestaurantId>,
    #[validate(length(min = 2, max = 100, message = "length must be between 2 and 100"))]
    pub name: String,
    #[validate(length(min = 5, max = 100, message = "length must be between 5 and 100"))]
    pub location: String,
}

impl RestaurantSpec {
    pub fn into_restaurant(self, id: RestaurantId) -> Restaurant {
        Restaurant {
            id,
            name: self.name,
            location: self.location,
        }
    }
}

impl HasId for RestaurantSpec {
    fn id(&self) -> Option<u32> {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = Some(id);
    }
}

/// Outbound restaurant representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDesc {
    pub id: RestaurantId,
    pub name: String,
    pub location: String,
}

impl From<Restaurant> for RestaurantDesc {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            location: restaurant.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Error;

    #[test]
    fn short_location_is_rejected() {
        let spec = RestaurantSpec {
            id: None,
            name: "Pancake House".to_string(),
            location: "st".to_string(),
        };
        let err: Error = spec.validate().unwrap_err().into();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("[location]")));
    }
}
