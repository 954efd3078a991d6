pub mod attendance;
pub mod classes;
pub mod feedback;

use axum::extract::Path;
use axum::routing::{delete, patch, post};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::models::Notification;
use crate::state::AppState;
use crate::{db::repository, validate};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/classes", get(classes::list_classes).post(classes::create_class))
        .route(
            "/classes/{id}",
            get(classes::get_class)
                .patch(classes::update_class)
                .delete(classes::delete_class),
        )
        .route("/classes/{id}/ping", post(classes::ping_class))
        .route(
            "/classes/{id}/students",
            get(classes::get_roster).post(classes::enroll_student),
        )
        .route(
            "/classes/{id}/students/{student_id}",
            delete(classes::unenroll_student),
        )
        .route("/students", get(classes::list_students).post(classes::create_student))
        .route("/classes/{id}/sessions", get(attendance::get_sessions))
        .route(
            "/classes/{id}/sessions/upcoming",
            get(attendance::get_upcoming_sessions),
        )
        .route("/classes/{id}/attendance", get(attendance::get_attendance))
        .route(
            "/classes/{id}/attendance/range",
            get(attendance::get_attendance_range),
        )
        .route(
            "/classes/{id}/attendance/bulk",
            patch(attendance::bulk_update_attendance),
        )
        .route("/classes/{id}/attendance/grid", get(attendance::get_attendance_grid))
        .route(
            "/classes/{id}/feedback-forms",
            post(feedback::create_feedback_form),
        )
        .route("/feedback/{form_id}", get(feedback::get_feedback_form))
        .route(
            "/feedback/{form_id}/responses",
            post(feedback::submit_feedback_response),
        )
        .route(
            "/classes/{id}/feedback-forms/{form_id}/responses",
            get(feedback::list_feedback_responses),
        )
        .route("/notifications", get(list_notifications))
        .route("/notifications/{id}/read", patch(mark_notification_read))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = repository::fetch_notifications(&state.db).await?;
    Ok(Json(notifications))
}

async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    validate::identifier(&id)?;
    let ok = repository::mark_notification_read(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
