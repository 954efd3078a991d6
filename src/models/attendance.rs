use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sentinel date key for the per-(class, student) tuition flag, which is
/// not scoped to any session date.
pub const TUITION_DATE_KEY: &str = "__TUITION__";

/// Canonical `YYYY-MM-DD` key for a session date. ISO dates sort
/// lexically, which the range endpoint relies on.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One sparse record as stored and as returned on the wire. Absence of a
/// record for a key means false for every field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: String,
    pub date_key: String,
    pub attendance: bool,
    pub homework: bool,
    pub tuition: bool,
}

/// Per-student view of the sparse records: date key to flag maps, plus
/// the single tuition flag folded out of its sentinel row.
#[derive(Debug, Clone, Default)]
pub struct StudentMarks {
    pub attendance: HashMap<String, bool>,
    pub homework: HashMap<String, bool>,
    pub tuition: bool,
}

/// Group fetched rows by student, separating the tuition sentinel from
/// the date-keyed rows.
pub fn fold_marks(rows: &[AttendanceRecord]) -> HashMap<String, StudentMarks> {
    let mut map: HashMap<String, StudentMarks> = HashMap::new();
    for row in rows {
        let marks = map.entry(row.student_id.clone()).or_default();
        if row.date_key == TUITION_DATE_KEY {
            marks.tuition = row.tuition;
        } else {
            marks.attendance.insert(row.date_key.clone(), row.attendance);
            marks.homework.insert(row.date_key.clone(), row.homework);
        }
    }
    map
}

/// One row of a bulk batch. Every field is optional so a malformed row
/// deserializes fine and can be skipped instead of failing the whole
/// batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceChange {
    pub student_id: Option<String>,
    pub date_key: Option<String>,
    pub attendance: Option<bool>,
    pub homework: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitionChange {
    pub student_id: Option<String>,
    pub tuition: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceRequest {
    #[serde(default)]
    pub changes: Vec<AttendanceChange>,
    #[serde(default)]
    pub tuition_changes: Vec<TuitionChange>,
}
