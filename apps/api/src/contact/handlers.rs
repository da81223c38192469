use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::debug;

use super::form::{ContactForm, ContactOutcome};
use super::ContactSubmission;
use crate::errors::AppError;
use crate::state::AppState;

pub fn contact_router() -> Router<AppState> {
    Router::new().route("/api/v1/contact", post(handle_submit))
}

/// POST /api/v1/contact
///
/// `200` when the message was accepted, `400` with per-field errors when the
/// form is invalid, `502` when delivery failed. The body always carries the
/// notice and the form as it stands after the attempt. A body that is not a
/// JSON form gets the usual error body.
pub async fn handle_submit(
    State(state): State<AppState>,
    body: Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactOutcome>), AppError> {
    let Json(submission) = body.map_err(|rejection| {
        debug!("Unreadable contact body: {rejection}");
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let mut form = ContactForm::with_values(submission);
    let notice = form.submit(state.contact.as_ref()).await;

    let status = if notice.is_success() {
        StatusCode::OK
    } else if !form.errors().is_empty() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    Ok((status, Json(form.outcome(notice))))
}
