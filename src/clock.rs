use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the current wall-clock date and time.
///
/// Lives in managed state so the cutoff rules never reach for the system
/// clock directly; tests construct a fixed instance instead.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    fixed: Option<NaiveDateTime>,
}

impl Clock {
    /// The real system clock, in local time.
    pub fn system() -> Self {
        Self { fixed: None }
    }

    /// A clock frozen at the given instant.
    pub fn fixed(at: NaiveDateTime) -> Self {
        Self { fixed: Some(at) }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.fixed.unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn time(&self) -> NaiveTime {
        self.now().time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 3, 14)
            .unwrap()
            .and_hms_opt(10, 30, 15)
            .unwrap()
    }

    #[test]
    fn fixed_clock_reports_its_instant() {
        let clock = Clock::fixed(instant());
        assert_eq!(clock.now(), instant());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2022, 3, 14).unwrap());
        assert_eq!(clock.time(), NaiveTime::from_hms_opt(10, 30, 15).unwrap());
    }

    #[test]
    fn system_clock_advances() {
        let clock = Clock::system();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
