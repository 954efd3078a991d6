use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A public feedback form for one class, shared out-of-band (e.g. as a
/// QR link). Anyone with the form id can read it and submit a response.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackForm {
    pub id: String,
    pub class_id: String,
    pub title: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeedbackFormRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: String,
    pub form_id: String,
    pub student_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedbackResponseRequest {
    pub student_name: String,
    pub rating: i64,
    pub comment: Option<String>,
}
