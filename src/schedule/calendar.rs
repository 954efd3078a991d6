use chrono::{Datelike, Days, NaiveDate};

use super::parser::WeekdaySet;

/// Hard cap on how many days the N-forward scan will walk before giving
/// up, so an empty weekday set cannot hang the request.
const MAX_SCAN_DAYS: u32 = 3650;

/// Result of an N-forward scan. `exhausted` is set when the scan hit its
/// day cap before collecting the requested number of sessions; `dates`
/// then holds however many were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingSessions {
    pub dates: Vec<NaiveDate>,
    pub exhausted: bool,
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(first);
    (first, last)
}

/// All dates in `[start, end]` whose weekday is in `weekdays`, ascending.
pub fn session_dates_in_range(
    start: NaiveDate,
    end: NaiveDate,
    weekdays: &WeekdaySet,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut day = start;
    while day <= end {
        if weekdays.contains(day.weekday()) {
            dates.push(day);
        }
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    dates
}

/// Walk forward from `start` (inclusive) collecting the next `count`
/// session dates. Capped at [`MAX_SCAN_DAYS`] so an empty or sparse
/// weekday set returns a short result instead of looping forever.
pub fn upcoming_session_dates(
    start: NaiveDate,
    weekdays: &WeekdaySet,
    count: usize,
) -> UpcomingSessions {
    let mut dates = Vec::with_capacity(count);
    let mut day = start;
    let mut scanned = 0u32;

    while dates.len() < count && scanned < MAX_SCAN_DAYS {
        if weekdays.contains(day.weekday()) {
            dates.push(day);
        }
        scanned += 1;
        day = match day.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    let exhausted = dates.len() < count;
    UpcomingSessions { dates, exhausted }
}

/// Split a month's session dates into the fixed two-column layout:
/// day-of-month 1..=15 in the first group, the rest in the second.
/// Order is preserved within each group.
pub fn split_month_halves(dates: &[NaiveDate]) -> (Vec<NaiveDate>, Vec<NaiveDate>) {
    let (first, second): (Vec<NaiveDate>, Vec<NaiveDate>) =
        dates.iter().partition(|d| d.day() <= 15);
    (first, second)
}
