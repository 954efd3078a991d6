use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use eduzo::models::{date_key, StudentMarks};
use eduzo::schedule::{
    assemble_grid, month_bounds, parse_weekdays, session_dates_in_range, split_month_halves,
    upcoming_session_dates, WeekdaySet,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

#[test]
fn unrecognized_schedule_falls_back_to_default_days() {
    for text in ["", "9:00 AM", "every day at noon", "- 10:30", "xyz, abc - 1pm"] {
        let set = parse_weekdays(text);
        assert_eq!(set.indices(), vec![1, 3, 5], "input: {text:?}");
    }
}

#[test]
fn parses_mixed_case_and_abbreviations() {
    let set = parse_weekdays("MON, Tuesday, weds, thur - 5:00 PM");
    assert_eq!(set.indices(), vec![1, 2, 3, 4]);
    assert!(set.contains(Weekday::Mon));
    assert!(set.contains(Weekday::Thu));
    assert!(!set.contains(Weekday::Fri));
}

#[test]
fn duplicate_tokens_collapse() {
    let set = parse_weekdays("Mon, mon, MONDAY, Fri - 9:00 AM");
    assert_eq!(set.indices(), vec![1, 5]);
    assert_eq!(set.len(), 2);
}

#[test]
fn only_text_before_first_dash_is_parsed() {
    // "Sat" appears in the time segment and must be ignored.
    let set = parse_weekdays("Tue - 9:00 AM Sat");
    assert_eq!(set.indices(), vec![2]);
}

#[test]
fn month_bounds_cover_whole_month() {
    assert_eq!(month_bounds(d(2024, 8, 17)), (d(2024, 8, 1), d(2024, 8, 31)));
    assert_eq!(month_bounds(d(2024, 2, 5)), (d(2024, 2, 1), d(2024, 2, 29)));
    assert_eq!(month_bounds(d(2023, 12, 31)), (d(2023, 12, 1), d(2023, 12, 31)));
}

#[test]
fn month_mode_august_2024_has_13_mwf_sessions() {
    let weekdays = parse_weekdays("Mon, Wed, Fri - 9:00 AM");
    let (first, last) = month_bounds(d(2024, 8, 15));
    let dates = session_dates_in_range(first, last, &weekdays);

    assert_eq!(dates.len(), 13);
    assert_eq!(dates[0], d(2024, 8, 2));
    assert_eq!(*dates.last().expect("non-empty"), d(2024, 8, 30));
    for pair in dates.windows(2) {
        assert!(pair[0] < pair[1], "dates must be strictly ascending");
    }
    for date in &dates {
        assert!(weekdays.contains(date.weekday()));
    }
}

#[test]
fn range_is_inclusive_of_both_ends() {
    let weekdays: WeekdaySet = [Weekday::Mon, Weekday::Fri].into_iter().collect();
    // 2024-08-02 is a Friday, 2024-08-05 a Monday.
    let dates = session_dates_in_range(d(2024, 8, 2), d(2024, 8, 5), &weekdays);
    assert_eq!(dates, vec![d(2024, 8, 2), d(2024, 8, 5)]);
}

#[test]
fn n_forward_includes_matching_start_date() {
    let weekdays = parse_weekdays("Mon, Wed, Fri - 9:00 AM");
    // 2024-08-07 is a Wednesday.
    let upcoming = upcoming_session_dates(d(2024, 8, 7), &weekdays, 3);
    assert!(!upcoming.exhausted);
    assert_eq!(
        upcoming.dates,
        vec![d(2024, 8, 7), d(2024, 8, 9), d(2024, 8, 12)]
    );
}

#[test]
fn n_forward_with_empty_weekday_set_terminates() {
    let empty = WeekdaySet::new();
    let upcoming = upcoming_session_dates(d(2024, 8, 1), &empty, 3);
    assert!(upcoming.exhausted);
    assert!(upcoming.dates.is_empty());
}

#[test]
fn month_mode_with_empty_weekday_set_is_empty() {
    let empty = WeekdaySet::new();
    let dates = session_dates_in_range(d(2024, 8, 1), d(2024, 8, 31), &empty);
    assert!(dates.is_empty());
}

#[test]
fn month_split_groups_by_fifteenth() {
    let weekdays = parse_weekdays("Mon, Wed, Fri - 9:00 AM");
    let dates = session_dates_in_range(d(2024, 8, 1), d(2024, 8, 31), &weekdays);
    let (first_half, second_half) = split_month_halves(&dates);

    assert_eq!(first_half.len() + second_half.len(), dates.len());
    assert!(first_half.iter().all(|date| date.day() <= 15));
    assert!(second_half.iter().all(|date| date.day() > 15));
    for pair in first_half.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn grid_pads_short_half_with_placeholders() {
    let first_half = vec![d(2024, 8, 2), d(2024, 8, 5), d(2024, 8, 7)];
    let second_half = vec![d(2024, 8, 19)];

    let mut marks = StudentMarks::default();
    marks.attendance.insert(date_key(d(2024, 8, 5)), true);
    marks.tuition = true;
    let mut records = HashMap::new();
    records.insert("s1".to_string(), marks);

    let roster = vec![
        ("s1".to_string(), "Alice".to_string()),
        ("s2".to_string(), "Bob".to_string()),
    ];
    let rows = assemble_grid(&roster, &first_half, &second_half, &records);

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.first_half.len(), 3);
        assert_eq!(row.second_half.len(), 3);
    }
    // Padding cells carry no date and read false.
    assert_eq!(rows[0].second_half[1].date, None);
    assert!(!rows[0].second_half[1].attendance);

    // Sparse lookups: the one toggled cell is true, everything else false.
    assert!(rows[0].first_half[1].attendance);
    assert!(!rows[0].first_half[0].attendance);
    assert!(rows[0].tuition);

    // Student with no records at all gets an all-false row.
    assert!(!rows[1].tuition);
    assert!(rows[1].first_half.iter().all(|c| !c.attendance && !c.homework));
}
