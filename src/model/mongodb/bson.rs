//! Filter helpers for the handful of value types we query on.
//!
//! Numeric ids are widened to `i64` so filters compare by value against
//! whatever integer width the driver chose at insert time. Dates and times
//! go through `to_bson` so filters always match the stored representation.

use chrono::{NaiveDate, NaiveTime};
use mongodb::bson::{doc, to_bson, Bson, Document};

/// Filter matching a document by its numeric `_id`.
pub fn id_filter(id: u32) -> Document {
    doc! { "_id": id as i64 }
}

/// Filter matching documents owned by the given restaurant.
pub fn restaurant_filter(restaurant_id: u32) -> Document {
    doc! { "restaurant_id": restaurant_id as i64 }
}

pub fn bson_date(date: NaiveDate) -> Bson {
    to_bson(&date).expect("date serialization is infallible")
}

pub fn bson_time(time: NaiveTime) -> Bson {
    to_bson(&time).expect("time serialization is infallible")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_serialize_to_sortable_strings() {
        let earlier = bson_date(NaiveDate::from_ymd_opt(2022, 3, 14).unwrap());
        let later = bson_date(NaiveDate::from_ymd_opt(2022, 11, 2).unwrap());
        let (Bson::String(earlier), Bson::String(later)) = (earlier, later) else {
            panic!("expected string representation");
        };
        assert_eq!(earlier, "2022-03-14");
        // Lexicographic order must agree with chronological order for
        // range filters over the stored strings to be correct.
        assert!(earlier < later);
    }

    #[test]
    fn whole_second_times_have_no_fraction() {
        let time = bson_time(NaiveTime::from_hms_opt(9, 5, 30).unwrap());
        assert_eq!(time, Bson::String("09:05:30".to_string()));
    }
}
