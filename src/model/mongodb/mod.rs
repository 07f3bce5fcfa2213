mod bson;
mod collection;
mod counter;

pub use bson::{bson_date, bson_time, id_filter, restaurant_filter};
pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{ensure_counters_exist, Counter};
