use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    ClassView, EnrollRequest, NewClassRequest, NewStudentRequest, Student, UpdateClassRequest,
};
use crate::state::AppState;
use crate::validate;

pub async fn list_classes(State(state): State<AppState>) -> Result<Json<Vec<ClassView>>, AppError> {
    let now = Utc::now();
    let classes = repository::fetch_classes(&state.db)
        .await?
        .into_iter()
        .map(|c| c.into_view(now))
        .collect();
    Ok(Json(classes))
}

pub async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<NewClassRequest>,
) -> Result<Json<ClassView>, AppError> {
    let class = repository::insert_class(&state.db, req).await?;
    Ok(Json(class.into_view(Utc::now())))
}

pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassView>, AppError> {
    validate::identifier(&id)?;
    let class = repository::find_class_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(class.into_view(Utc::now())))
}

pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<ClassView>, AppError> {
    validate::identifier(&id)?;
    let class = repository::update_class(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(class.into_view(Utc::now())))
}

pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    validate::identifier(&id)?;
    let ok = repository::delete_class(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

/// An online-session ping: flips the ephemeral online flag on, expiring
/// `duration_minutes - 15` minutes from now.
pub async fn ping_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassView>, AppError> {
    validate::identifier(&id)?;
    let class = repository::ping_class(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(class.into_view(Utc::now())))
}

pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = repository::fetch_students(&state.db).await?;
    Ok(Json(students))
}

pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<NewStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let student = repository::insert_student(&state.db, req).await?;
    Ok(Json(student))
}

pub async fn get_roster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Student>>, AppError> {
    validate::identifier(&id)?;
    repository::find_class_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let roster = repository::fetch_roster(&state.db, &id).await?;
    Ok(Json(roster))
}

pub async fn enroll_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EnrollRequest>,
) -> Result<StatusCode, AppError> {
    validate::identifier(&id)?;
    validate::identifier(&req.student_id)?;
    repository::find_class_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    repository::find_student_by_id(&state.db, &req.student_id)
        .await?
        .ok_or(AppError::NotFound)?;
    repository::enroll_student(&state.db, &id, &req.student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unenroll_student(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    validate::identifier(&id)?;
    validate::identifier(&student_id)?;
    let ok = repository::unenroll_student(&state.db, &id, &student_id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
