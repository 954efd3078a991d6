use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{date_key, fold_marks, AttendanceRecord, BulkAttendanceRequest, Class};
use crate::schedule::{
    assemble_grid, month_bounds, parse_weekdays, session_dates_in_range, split_month_halves,
    upcoming_session_dates, GridRow,
};
use crate::state::AppState;
use crate::validate;

#[derive(Deserialize)]
pub struct DatesQuery {
    #[serde(default)]
    dates: String,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    from: String,
    to: String,
}

#[derive(Deserialize)]
pub struct MonthQuery {
    month: String,
}

fn default_count() -> usize {
    3
}

#[derive(Deserialize)]
pub struct UpcomingQuery {
    from: Option<String>,
    #[serde(default = "default_count")]
    count: usize,
}

#[derive(Serialize)]
pub struct RecordsResponse {
    pub records: Vec<AttendanceRecord>,
}

#[derive(Serialize)]
pub struct SavedResponse {
    pub saved: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsResponse {
    pub dates: Vec<NaiveDate>,
    pub first_half: Vec<NaiveDate>,
    pub second_half: Vec<NaiveDate>,
}

#[derive(Serialize)]
pub struct UpcomingResponse {
    pub dates: Vec<NaiveDate>,
    pub exhausted: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub first_half_dates: Vec<NaiveDate>,
    pub second_half_dates: Vec<NaiveDate>,
    pub rows: Vec<GridRow>,
}

async fn load_class(state: &AppState, id: &str) -> Result<Class, AppError> {
    validate::identifier(id)?;
    repository::find_class_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Sparse records for an explicit list of date keys. Invalid entries in
/// the list are dropped silently; the tuition sentinel row rides along
/// whether or not it was asked for.
pub async fn get_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DatesQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    load_class(&state, &id).await?;

    let keys: Vec<String> = query
        .dates
        .split(',')
        .map(str::trim)
        .filter(|k| validate::is_iso_date_key(k))
        .map(str::to_string)
        .collect();

    let records = repository::fetch_attendance(&state.db, &id, &keys).await?;
    Ok(Json(RecordsResponse { records }))
}

pub async fn get_attendance_range(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    load_class(&state, &id).await?;
    validate::iso_date(&query.from)?;
    validate::iso_date(&query.to)?;

    let records =
        repository::fetch_attendance_range(&state.db, &id, &query.from, &query.to).await?;
    Ok(Json(RecordsResponse { records }))
}

pub async fn bulk_update_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BulkAttendanceRequest>,
) -> Result<Json<SavedResponse>, AppError> {
    load_class(&state, &id).await?;

    let saved =
        repository::bulk_upsert_attendance(&state.db, &id, &req.changes, &req.tuition_changes)
            .await?;
    Ok(Json(SavedResponse { saved }))
}

/// Month-mode session dates, derived fresh from the class schedule text.
pub async fn get_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<SessionsResponse>, AppError> {
    let class = load_class(&state, &id).await?;
    let any_day = validate::iso_month(&query.month)?;

    let weekdays = parse_weekdays(&class.schedule_text);
    let (first, last) = month_bounds(any_day);
    let dates = session_dates_in_range(first, last, &weekdays);
    let (first_half, second_half) = split_month_halves(&dates);

    Ok(Json(SessionsResponse {
        dates,
        first_half,
        second_half,
    }))
}

/// The next `count` session dates walking forward from `from`
/// (inclusive). `exhausted` is set when the scan cap was hit first.
pub async fn get_upcoming_sessions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<UpcomingResponse>, AppError> {
    let class = load_class(&state, &id).await?;
    let start = match &query.from {
        Some(raw) => validate::iso_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let weekdays = parse_weekdays(&class.schedule_text);
    let upcoming = upcoming_session_dates(start, &weekdays, query.count);

    Ok(Json(UpcomingResponse {
        dates: upcoming.dates,
        exhausted: upcoming.exhausted,
    }))
}

/// Dense month grid: roster rows against padded half-month columns, with
/// sparse records merged in.
pub async fn get_attendance_grid(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<GridResponse>, AppError> {
    let class = load_class(&state, &id).await?;
    let any_day = validate::iso_month(&query.month)?;

    let weekdays = parse_weekdays(&class.schedule_text);
    let (first, last) = month_bounds(any_day);
    let dates = session_dates_in_range(first, last, &weekdays);
    let (first_half, second_half) = split_month_halves(&dates);

    let keys: Vec<String> = dates.iter().map(|d| date_key(*d)).collect();
    let records = repository::fetch_attendance(&state.db, &id, &keys).await?;
    let marks = fold_marks(&records);

    let roster: Vec<(String, String)> = repository::fetch_roster(&state.db, &id)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let rows = assemble_grid(&roster, &first_half, &second_half, &marks);

    Ok(Json(GridResponse {
        first_half_dates: first_half,
        second_half_dates: second_half,
        rows,
    }))
}
