mod auth;
mod date;
mod dish;
mod menu;
mod pagination;
mod restaurant;
mod results;
mod user;
mod vote;

pub use auth::LoginRequest;
pub use date::{ApiDate, DateRange};
pub use dish::{DishDesc, DishSpec};
pub use menu::{DishPrices, MenuDesc, MenuParams, MenuSummary};
pub use pagination::Pagination;
pub use restaurant::{RestaurantDesc, RestaurantSpec};
pub use results::RestaurantResult;
pub use user::{UserDesc, UserSpec};
pub use vote::{VoteDescription, VoteParams};
