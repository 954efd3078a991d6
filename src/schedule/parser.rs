use chrono::Weekday;

/// Fallback when a class schedule names no recognizable weekday.
/// Kept as a named constant so a deployment can change the default
/// in one place.
pub const DEFAULT_WEEKDAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

/// Set of weekdays, indexed Sunday=0 .. Saturday=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new() -> Self {
        WeekdaySet(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_sunday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Weekday indices (0=Sunday..6=Saturday), ascending.
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|i| self.0 & (1 << i) != 0).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

fn weekday_token(token: &str) -> Option<Weekday> {
    match token {
        "sun" | "sunday" => Some(Weekday::Sun),
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "weds" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Parse a free-text schedule like `"Mon, Wed, Fri - 9:00 AM"` into the
/// set of weekdays the class meets on.
///
/// Only the segment before the first `-` is considered (the rest is the
/// display time). Unrecognized tokens are dropped; if nothing is left the
/// hardcoded [`DEFAULT_WEEKDAYS`] set is returned. Malformed input never
/// errors, it degrades to the default.
pub fn parse_weekdays(schedule_text: &str) -> WeekdaySet {
    let days_part = schedule_text.split('-').next().unwrap_or("");

    let set: WeekdaySet = days_part
        .split(',')
        .filter_map(|token| weekday_token(&token.trim().to_lowercase()))
        .collect();

    if set.is_empty() {
        DEFAULT_WEEKDAYS.into_iter().collect()
    } else {
        set
    }
}
