//! Recurring-promotion (Promo2) activity.

/// Abbreviated month names as they appear in promo-interval strings.
const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Whether the store's recurring promotion is active on the given day.
///
/// Inactive until the record's (year, ISO week) reaches the program start:
/// strictly by year first, then by week only within the start year. Once
/// reached, active only in months named in the interval string, so the
/// feature cycles on and off through the year. A store enrolled with no
/// recorded start is treated as started (week 0 of year 0); the month gate
/// still applies.
pub fn is_promo2_active(
    promo2: bool,
    since_year: Option<i32>,
    since_week: Option<u32>,
    promo_interval: Option<&str>,
    year: i32,
    week_of_year: u32,
    month: u32,
) -> bool {
    if !promo2 {
        return false;
    }

    let start_year = since_year.unwrap_or(0);
    let start_week = since_week.unwrap_or(0);

    if year < start_year {
        return false;
    }
    if year == start_year && week_of_year < start_week {
        return false;
    }

    let month_name = MONTH_ABBREV[(month - 1) as usize];
    promo_interval
        .map(|interval| interval.split(',').any(|token| token.trim() == month_name))
        .unwrap_or(false)
}
