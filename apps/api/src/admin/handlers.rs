use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::auth::AdminSession;
use super::inbox::{load_messages, mark_read, InboxView};
use super::save::save_record;
use crate::errors::AppError;
use crate::models::{About, Certification, ContactMessage, Education, Entity, Experience, Project};
use crate::state::AppState;
use crate::storage::PendingAsset;

/// Upper bound for multipart bodies carrying an image.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn admin_router() -> Router<AppState> {
    let router = Router::new()
        .route("/api/v1/admin/login", post(handle_login))
        .route("/api/v1/admin/logout", post(handle_logout))
        .route("/api/v1/admin/contacts", get(handle_list_messages))
        .route(
            "/api/v1/admin/contacts/:id/read",
            patch(handle_mark_read),
        )
        .route(
            "/api/v1/admin/contacts/:id",
            axum::routing::delete(handle_delete_message),
        );

    let router = entity_routes::<About>(router);
    let router = entity_routes::<Education>(router);
    let router = entity_routes::<Experience>(router);
    let router = entity_routes::<Certification>(router);
    let router = entity_routes::<Project>(router);

    router.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn entity_routes<E: Entity>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/api/v1/admin/{}", E::COLLECTION);
    router
        .route(&base, get(list_records::<E>).post(create_record::<E>))
        .route(
            &format!("{base}/:id"),
            put(update_record::<E>).delete(delete_record::<E>),
        )
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// POST /api/v1/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let identity = state
        .auth
        .sign_in(&req.email, &req.password)
        .await
        .map_err(|e| {
            warn!("Rejected admin login for {}: {e}", req.email);
            AppError::InvalidCredentials
        })?;

    let session = state.sessions.issue(&identity).await;
    Ok(Json(LoginResponse {
        token: session.token.to_string(),
        email: session.email,
        expires_at: session.expires_at,
    }))
}

/// POST /api/v1/admin/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> StatusCode {
    state.sessions.revoke(session.token).await;
    if let Err(e) = state.auth.sign_out(&session.identity()).await {
        error!("Error logging out {}: {e}", session.email);
    }
    StatusCode::NO_CONTENT
}

/// GET /api/v1/admin/{collection}
pub async fn list_records<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<E>>, AppError> {
    Ok(Json(state.repo::<E>().list().await?))
}

/// POST /api/v1/admin/{collection}
pub async fn create_record<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<(StatusCode, Json<E>), AppError> {
    let (mut record, asset) = read_submission::<E>(multipart).await?;
    record.set_id(None);

    let saved = save_record(
        &state.repo::<E>(),
        state.assets.as_ref(),
        record,
        asset.as_ref(),
    )
    .await?;
    // A singleton kind may have updated its existing record instead.
    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(saved.record)))
}

/// PUT /api/v1/admin/{collection}/:id
pub async fn update_record<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<E>, AppError> {
    let (mut record, asset) = read_submission::<E>(multipart).await?;
    record.set_id(Some(id));

    let saved = save_record(
        &state.repo::<E>(),
        state.assets.as_ref(),
        record,
        asset.as_ref(),
    )
    .await?;
    Ok(Json(saved.record))
}

/// DELETE /api/v1/admin/{collection}/:id
pub async fn delete_record<E: Entity>(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo::<E>().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/contacts
pub async fn handle_list_messages(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<InboxView>, AppError> {
    let messages = load_messages(&state.repo::<ContactMessage>()).await?;
    Ok(Json(InboxView::from_messages(messages)))
}

/// PATCH /api/v1/admin/contacts/:id/read
pub async fn handle_mark_read(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    mark_read(&state.repo::<ContactMessage>(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/contacts/:id
pub async fn handle_delete_message(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.repo::<ContactMessage>().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reads the `record` JSON part and the optional `asset` file part.
async fn read_submission<E: Entity>(
    mut multipart: Multipart,
) -> Result<(E, Option<PendingAsset>), AppError> {
    let mut record = None;
    let mut asset = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "record" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable record part: {e}")))?;
                let parsed: E = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("Invalid record: {e}")))?;
                record = Some(parsed);
            }
            "asset" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Unreadable asset part: {e}")))?;
                if !bytes.is_empty() {
                    asset = Some(PendingAsset::new(file_name, content_type, bytes));
                }
            }
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    let record =
        record.ok_or_else(|| AppError::Validation("Missing 'record' part".to_string()))?;
    Ok((record, asset))
}
