use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{date_key, StudentMarks};

/// One cell of the dense attendance grid. `date` is `None` for the
/// placeholder cells that pad the shorter half-month column.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub date: Option<NaiveDate>,
    pub attendance: bool,
    pub homework: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub student_id: String,
    pub student_name: String,
    pub tuition: bool,
    pub first_half: Vec<GridCell>,
    pub second_half: Vec<GridCell>,
}

fn cells_for(
    dates: &[NaiveDate],
    padded_len: usize,
    marks: Option<&StudentMarks>,
) -> Vec<GridCell> {
    let mut cells: Vec<GridCell> = dates
        .iter()
        .map(|d| {
            let key = date_key(*d);
            GridCell {
                date: Some(*d),
                attendance: marks
                    .map(|m| m.attendance.get(&key).copied().unwrap_or(false))
                    .unwrap_or(false),
                homework: marks
                    .map(|m| m.homework.get(&key).copied().unwrap_or(false))
                    .unwrap_or(false),
            }
        })
        .collect();

    // Pad with empty placeholders so both halves render the same row
    // height. Never invents a real session date.
    while cells.len() < padded_len {
        cells.push(GridCell {
            date: None,
            attendance: false,
            homework: false,
        });
    }
    cells
}

/// Combine the derived session dates with the sparse per-student record
/// map into a dense display grid. Absent records read as false
/// throughout. Pure transform, no storage access.
pub fn assemble_grid(
    roster: &[(String, String)],
    first_half: &[NaiveDate],
    second_half: &[NaiveDate],
    records: &HashMap<String, StudentMarks>,
) -> Vec<GridRow> {
    let padded_len = first_half.len().max(second_half.len());

    roster
        .iter()
        .map(|(student_id, student_name)| {
            let marks = records.get(student_id);
            GridRow {
                student_id: student_id.clone(),
                student_name: student_name.clone(),
                tuition: marks.map(|m| m.tuition).unwrap_or(false),
                first_half: cells_for(first_half, padded_len, marks),
                second_half: cells_for(second_half, padded_len, marks),
            }
        })
        .collect()
}
