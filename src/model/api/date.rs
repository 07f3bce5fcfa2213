use std::ops::Deref;

use chrono::NaiveDate;
use rocket::form::{self, prelude::ErrorKind, FromFormField, ValueField};

use crate::rules::{end_or_max, start_or_min};

/// An ISO `yyyy-mm-dd` date in a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiDate(pub NaiveDate);

impl Deref for ApiDate {
    type Target = NaiveDate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'r> FromFormField<'r> for ApiDate {
    fn from_value(field: ValueField<'r>) -> form::Result<'r, Self> {
        field
            .value
            .parse::<NaiveDate>()
            .map(ApiDate)
            .map_err(|err| {
                let error = ErrorKind::Custom(Box::new(err));
                error.into()
            })
    }
}

/// Optional inclusive date bounds, as used by every history endpoint.
/// Missing bounds widen to the sentinel range.
#[derive(Debug, FromForm)]
pub struct DateRange {
    #[field(name = "startDate")]
    pub start_date: Option<ApiDate>,
    #[field(name = "endDate")]
    pub end_date: Option<ApiDate>,
}

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        start_or_min(self.start_date.map(|date| date.0))
    }

    pub fn end(&self) -> NaiveDate {
        end_or_max(self.end_date.map(|date| date.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rules::{date_max, date_min};

    #[test]
    fn missing_bounds_widen_to_sentinels() {
        let range = DateRange {
            start_date: None,
            end_date: None,
        };
        assert_eq!(range.start(), date_min());
        assert_eq!(range.end(), date_max());
    }

    #[test]
    fn explicit_bounds_are_kept() {
        let date = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        let range = DateRange {
            start_date: Some(ApiDate(date)),
            end_date: Some(ApiDate(date)),
        };
        assert_eq!(range.start(), date);
        assert_eq!(range.end(), date);
    }
}
