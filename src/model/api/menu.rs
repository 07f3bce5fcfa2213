use std::collections::HashSet;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::model::db::{Dish, DishId, Menu, MenuId, Restaurant, RestaurantId};

use super::date::ApiDate;

/// Query parameters for menu creation and dish-list replacement.
#[derive(Debug, FromForm)]
pub struct MenuParams {
    #[field(name = "forDate")]
    pub for_date: Option<ApiDate>,
    pub dishes: Vec<DishId>,
}

/// Outbound menu representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDesc {
    pub id: MenuId,
    pub for_date: NaiveDate,
    pub restaurant_id: RestaurantId,
    pub dish_ids: Vec<DishId>,
}

impl From<Menu> for MenuDesc {
    fn from(menu: Menu) -> Self {
        Self {
            id: menu.id,
            for_date: menu.for_date,
            restaurant_id: menu.restaurant_id,
            dish_ids: menu.dish_ids,
        }
    }
}

/// One restaurant's offer for the day, shaped for the voting page:
/// dish name to price, cheapest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSummary {
    pub id: RestaurantId,
    pub name: String,
    pub location: String,
    pub dishes: DishPrices,
}

impl MenuSummary {
    /// Project a restaurant and its dishes of the day.
    ///
    /// Dishes are sorted ascending by price and deduplicated by name with
    /// the first (cheapest) occurrence winning.
    pub fn project(restaurant: &Restaurant, dishes: &[Dish]) -> Self {
        let mut by_price: Vec<&Dish> = dishes.iter().collect();
        by_price.sort_by_key(|dish| dish.price);

        let mut seen = HashSet::new();
        let prices = by_price
            .into_iter()
            .filter(|dish| seen.insert(dish.name.clone()))
            .map(|dish| (dish.name.clone(), dish.price))
            .collect();

        Self {
            id: restaurant.id,
            name: restaurant.name.clone(),
            location: restaurant.location.clone(),
            dishes: DishPrices(prices),
        }
    }
}

/// An order-preserving name-to-price mapping. Serialized as a JSON object
/// whose keys appear in ascending price order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishPrices(pub Vec<(String, u32)>);

impl Serialize for DishPrices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, price) in &self.0 {
            map.serialize_entry(name, price)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(id: DishId, name: &str, price: u32) -> Dish {
        Dish {
            id,
            name: name.to_string(),
            price,
            restaurant_id: 1,
        }
    }

    #[test]
    fn dishes_are_ordered_by_ascending_price() {
        let restaurant = Restaurant::example();
        let dishes = [
            dish(1, "Pelmeni", 320),
            dish(2, "Borscht", 250),
            dish(3, "Kvass", 90),
        ];
        let summary = MenuSummary::project(&restaurant, &dishes);
        let prices: Vec<u32> = summary.dishes.0.iter().map(|(_, price)| *price).collect();
        assert_eq!(prices, vec![90, 250, 320]);
        assert_eq!(summary.id, restaurant.id);
        assert_eq!(summary.name, restaurant.name);
    }

    #[test]
    fn duplicate_names_keep_the_cheapest_occurrence() {
        let restaurant = Restaurant::example();
        let dishes = [
            dish(1, "Borscht", 300),
            dish(2, "Borscht", 250),
            dish(3, "Pelmeni", 320),
        ];
        let summary = MenuSummary::project(&restaurant, &dishes);
        assert_eq!(
            summary.dishes.0,
            vec![
                ("Borscht".to_string(), 250),
                ("Pelmeni".to_string(), 320),
            ]
        );
    }

    #[test]
    fn serialization_preserves_price_order() {
        let restaurant = Restaurant::example();
        let dishes = [dish(1, "Zander", 400), dish(2, "Apple pie", 150)];
        let summary = MenuSummary::project(&restaurant, &dishes);
        let json = serde_json::to_string(&summary.dishes).unwrap();
        assert_eq!(json, r#"{"Apple pie":150,"Zander":400}"#);
    }
}
