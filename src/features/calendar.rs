//! Calendar features derived from the record date.

use chrono::{Datelike, NaiveDate};

/// Date decomposed into the model's calendar features.
///
/// `day_of_week` follows the ISO convention with Monday = 0; `week_of_year`
/// is the ISO week number. Training and inference share this single
/// derivation, so the convention cannot drift between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_of_week: u8,
    pub week_of_year: u32,
}

/// Derive all calendar features from a date.
pub fn derive(date: NaiveDate) -> CalendarFeatures {
    CalendarFeatures {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        day_of_week: date.weekday().num_days_from_monday() as u8,
        week_of_year: date.iso_week().week(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_is_zero() {
        // 2015-07-27 was a Monday, 2015-08-02 a Sunday.
        assert_eq!(derive(ymd(2015, 7, 27)).day_of_week, 0);
        assert_eq!(derive(ymd(2015, 8, 2)).day_of_week, 6);
    }

    #[test]
    fn iso_week_crosses_year_boundary() {
        // 2014-12-29 belongs to ISO week 1 of 2015, but the year feature
        // stays the calendar year.
        let features = derive(ymd(2014, 12, 29));
        assert_eq!(features.year, 2014);
        assert_eq!(features.week_of_year, 1);

        // 2016-01-01 falls in ISO week 53 of 2015.
        let features = derive(ymd(2016, 1, 1));
        assert_eq!(features.year, 2016);
        assert_eq!(features.week_of_year, 53);
    }

    #[test]
    fn plain_date_fields() {
        let features = derive(ymd(2014, 3, 5));
        assert_eq!((features.year, features.month, features.day), (2014, 3, 5));
        assert_eq!(features.week_of_year, 10);
    }
}
