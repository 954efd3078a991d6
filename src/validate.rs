//! Shared request validation guards. Every handler that takes an id or a
//! date goes through here instead of rolling its own checks.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppError;

/// Entity ids are uuid v4 strings; anything else is a 400.
pub fn identifier(id: &str) -> Result<(), AppError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| AppError::InvalidIdentifier(id.to_string()))
}

/// Strict `YYYY-MM-DD`, returned parsed.
pub fn iso_date(value: &str) -> Result<NaiveDate, AppError> {
    if !is_iso_date_key(value) {
        return Err(AppError::InvalidDateFormat(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDateFormat(value.to_string()))
}

/// Shape check only (`\d{4}-\d{2}-\d{2}`), used to filter date-key lists
/// where bad entries are dropped rather than rejected.
pub fn is_iso_date_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit())
}

/// `YYYY-MM`, returned as the first day of that month.
pub fn iso_month(value: &str) -> Result<NaiveDate, AppError> {
    let parse = || -> Option<NaiveDate> {
        let (year, month) = value.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
    };
    parse().ok_or_else(|| AppError::InvalidDateFormat(value.to_string()))
}
