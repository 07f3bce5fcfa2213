use serde::{Deserialize, Serialize};

use super::RestaurantId;

/// A restaurant users can vote for. Dishes, menus and votes reference it
/// by id; there are no back-references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: RestaurantId,
    pub name: String,
    pub location: String,
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Restaurant {
        pub fn example() -> Self {
            Self {
                id: 1,
                name: "Pancake House".to_string(),
                location: "12 High Street".to_string(),
            }
        }

        pub fn example2() -> Self {
            Self {
                id: 2,
                name: "Noodle Bar".to_string(),
                location: "3 Market Square".to_string(),
            }
        }
    }
}
