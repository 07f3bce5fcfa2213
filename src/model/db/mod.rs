mod dish;
mod menu;
mod restaurant;
mod user;
mod vote;

pub use dish::Dish;
pub use menu::Menu;
pub use restaurant::Restaurant;
pub use user::{ensure_admin_exists, hash_password, User};
pub use vote::{truncate_to_seconds, Vote};

pub type RestaurantId = u32;
pub type DishId = u32;
pub type MenuId = u32;
pub type VoteId = u32;
pub type UserId = u32;
