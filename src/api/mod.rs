use rocket::Route;

mod auth;
mod common;
mod dish;
mod menu;
mod restaurant;
mod root;
mod user;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(auth::routes());
    routes.extend(root::routes());
    routes.extend(restaurant::routes());
    routes.extend(dish::routes());
    routes.extend(menu::routes());
    routes.extend(user::routes());
    routes
}
