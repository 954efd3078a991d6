use axum::Json;
use axum::extract::{Path, State};
use tracing::warn;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    FeedbackForm, FeedbackResponse, NewFeedbackFormRequest, NewFeedbackResponseRequest,
};
use crate::notify::NotificationEvent;
use crate::state::AppState;
use crate::validate;

pub async fn create_feedback_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewFeedbackFormRequest>,
) -> Result<Json<FeedbackForm>, AppError> {
    validate::identifier(&id)?;
    repository::find_class_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    let form = repository::insert_feedback_form(&state.db, &id, req).await?;
    Ok(Json(form))
}

/// Public read: anyone holding the shared form link can load it.
pub async fn get_feedback_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<FeedbackForm>, AppError> {
    validate::identifier(&form_id)?;
    let form = repository::find_feedback_form(&state.db, &form_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(form))
}

/// Public submit. Persists the response, records a notification row,
/// and pushes the event out through the notifier. Delivery failure is
/// logged and never fails the submission.
pub async fn submit_feedback_response(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(req): Json<NewFeedbackResponseRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    validate::identifier(&form_id)?;
    let form = repository::find_feedback_form(&state.db, &form_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !(1..=5).contains(&req.rating) {
        return Err(AppError::BadRequest(format!(
            "rating must be between 1 and 5, got {}",
            req.rating
        )));
    }

    let response = repository::insert_feedback_response(&state.db, &form_id, req).await?;

    let message = format!(
        "New feedback on \"{}\" from {} ({}/5)",
        form.title, response.student_name, response.rating
    );
    repository::insert_notification(&state.db, Some(&form.class_id), "feedback", &message).await?;

    let event = NotificationEvent {
        kind: "feedback".to_string(),
        class_id: Some(form.class_id.clone()),
        message,
    };
    if let Err(e) = state.notifier.notify(&event).await {
        warn!("notification delivery failed: {:?}", e);
    }

    Ok(Json(response))
}

pub async fn list_feedback_responses(
    State(state): State<AppState>,
    Path((id, form_id)): Path<(String, String)>,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    validate::identifier(&id)?;
    validate::identifier(&form_id)?;
    let form = repository::find_feedback_form(&state.db, &form_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if form.class_id != id {
        return Err(AppError::NotFound);
    }
    let responses = repository::fetch_feedback_responses(&state.db, &form_id).await?;
    Ok(Json(responses))
}
