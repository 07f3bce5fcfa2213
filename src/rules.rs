//! Business-rule checks shared by the route handlers: vote cutoff,
//! past-date edits, "new entity" payloads and path/body id consistency.

use chrono::{NaiveDate, NaiveTime};

use crate::clock::Clock;
use crate::error::{Error, Result};

/// Lower bound used when a date-range filter has no explicit start.
pub fn date_min() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid constant date")
}

/// Upper bound used when a date-range filter has no explicit end.
pub fn date_max() -> NaiveDate {
    NaiveDate::from_ymd_opt(3000, 1, 1).expect("valid constant date")
}

pub fn start_or_min(start: Option<NaiveDate>) -> NaiveDate {
    match start {
        Some(date) if date >= date_min() => date,
        _ => date_min(),
    }
}

pub fn end_or_max(end: Option<NaiveDate>) -> NaiveDate {
    match end {
        Some(date) if date <= date_max() => date,
        _ => date_max(),
    }
}

/// A payload that may carry its own identifier.
pub trait HasId {
    fn id(&self) -> Option<u32>;
    fn set_id(&mut self, id: u32);
}

/// Voting is only open strictly before the cutoff time-of-day.
pub fn check_current_time(clock: &Clock, cutoff: NaiveTime) -> Result<()> {
    if clock.time() >= cutoff {
        Err(Error::late(format!("Voting ended at {cutoff}")))
    } else {
        Ok(())
    }
}

/// Entities dated in the past can no longer be edited.
pub fn check_current_date(clock: &Clock, target: NaiveDate) -> Result<()> {
    if clock.today() > target {
        Err(Error::late(format!("{target} is already over")))
    } else {
        Ok(())
    }
}

/// A create payload must not carry a pre-assigned identifier.
pub fn check_new(payload: &impl HasId, kind: &str) -> Result<()> {
    match payload.id() {
        None => Ok(()),
        Some(_) => Err(Error::illegal(format!("{kind} must be new (id=null)"))),
    }
}

/// Accept a missing id, assigning the expected one; reject a mismatch.
pub fn assure_id_consistent(payload: &mut impl HasId, expected: u32, kind: &str) -> Result<()> {
    match payload.id() {
        None => {
            payload.set_id(expected);
            Ok(())
        }
        Some(id) if id == expected => Ok(()),
        Some(_) => Err(Error::illegal(format!("{kind} must have id={expected}"))),
    }
}

/// A nested resource must belong to the owner named in the path.
pub fn check_owner(owner_id: u32, expected: u32, kind: &str) -> Result<()> {
    if owner_id == expected {
        Ok(())
    } else {
        Err(Error::illegal(format!(
            "{kind} belongs to restaurant {owner_id}, not {expected}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;

    struct Payload {
        id: Option<u32>,
    }

    impl HasId for Payload {
        fn id(&self) -> Option<u32> {
            self.id
        }

        fn set_id(&mut self, id: u32) {
            self.id = Some(id);
        }
    }

    fn clock_at(time: &str) -> Clock {
        let at = NaiveDateTime::parse_from_str(&format!("2022-03-14T{time}"), "%Y-%m-%dT%H:%M:%S")
            .unwrap();
        Clock::fixed(at)
    }

    fn cutoff() -> NaiveTime {
        NaiveTime::from_hms_opt(11, 0, 0).unwrap()
    }

    #[test]
    fn vote_before_cutoff_is_allowed() {
        assert!(check_current_time(&clock_at("10:59:59"), cutoff()).is_ok());
    }

    #[test]
    fn vote_at_cutoff_is_late() {
        let err = check_current_time(&clock_at("11:00:00"), cutoff()).unwrap_err();
        assert!(matches!(err, Error::LateVote(_)));
    }

    #[test]
    fn vote_after_cutoff_is_late() {
        let err = check_current_time(&clock_at("11:00:01"), cutoff()).unwrap_err();
        assert!(matches!(err, Error::LateVote(_)));
    }

    #[test]
    fn today_and_future_dates_are_editable() {
        let clock = clock_at("12:00:00");
        assert!(check_current_date(&clock, clock.today()).is_ok());
        assert!(check_current_date(&clock, clock.today().succ_opt().unwrap()).is_ok());
    }

    #[test]
    fn past_dates_are_locked() {
        let clock = clock_at("12:00:00");
        let err = check_current_date(&clock, clock.today().pred_opt().unwrap()).unwrap_err();
        assert!(matches!(err, Error::LateVote(_)));
    }

    #[test]
    fn check_new_rejects_preassigned_ids() {
        assert!(check_new(&Payload { id: None }, "Dish").is_ok());
        let err = check_new(&Payload { id: Some(3) }, "Dish").unwrap_err();
        assert!(matches!(err, Error::IllegalRequestData(_)));
    }

    #[test]
    fn assure_id_consistent_assigns_missing_id() {
        let mut payload = Payload { id: None };
        assure_id_consistent(&mut payload, 5, "Dish").unwrap();
        assert_eq!(payload.id, Some(5));
    }

    #[test]
    fn assure_id_consistent_accepts_matching_id() {
        let mut payload = Payload { id: Some(5) };
        assure_id_consistent(&mut payload, 5, "Dish").unwrap();
        assert_eq!(payload.id, Some(5));
    }

    #[test]
    fn assure_id_consistent_rejects_mismatch() {
        let mut payload = Payload { id: Some(7) };
        let err = assure_id_consistent(&mut payload, 5, "Dish").unwrap_err();
        assert!(matches!(err, Error::IllegalRequestData(_)));
    }

    #[test]
    fn open_ended_ranges_default_to_sentinels() {
        assert_eq!(start_or_min(None), date_min());
        assert_eq!(end_or_max(None), date_max());

        let date = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        assert_eq!(start_or_min(Some(date)), date);
        assert_eq!(end_or_max(Some(date)), date);

        // Out-of-range bounds collapse to the sentinels as well.
        let before_min = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        let after_max = NaiveDate::from_ymd_opt(3000, 1, 2).unwrap();
        assert_eq!(start_or_min(Some(before_min)), date_min());
        assert_eq!(end_or_max(Some(after_max)), date_max());
    }
}
