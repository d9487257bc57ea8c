use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::db::Registration;
use crate::error::{AppError, ValidationError};
use crate::qr;
use crate::register::{self, SubmitInput};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SubmitResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration: Option<Registration>,
}

/// Public registration form.
pub async fn register_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = register::render_form(&state.templates, &state.catalog)?;
    Ok(Html(page))
}

/// JSON submission endpoint. Rejections carry the catalog's localized
/// message for the submitter.
pub async fn register_submit(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SubmitInput>,
) -> Response {
    match register::submit(&state.catalog, &state.store, &input) {
        Ok(registration) => Json(SubmitResponse {
            success: true,
            message: state.catalog.text("registration_success").to_string(),
            registration: Some(registration),
        })
        .into_response(),
        Err(e) => rejection(&state, e),
    }
}

#[derive(Deserialize)]
pub struct AdminAuth {
    #[serde(default)]
    password: String,
}

/// Admin overview: grades with their classes, registered names and counts.
pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    Query(auth): Query<AdminAuth>,
) -> Result<Html<String>, AppError> {
    require_admin(&state, &auth.password)?;
    let page = register::render_admin(&state.templates, &state.catalog, &state.store)?;
    Ok(Html(page))
}

/// Fresh snapshot of grades, classes and registered names for the admin UI.
pub async fn api_refresh(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let grades = register::grade_snapshot(&state.catalog, &state.store)?;
    Ok(Json(json!({ "success": true, "grades": grades })))
}

#[derive(Deserialize)]
pub struct RemoveInput {
    #[serde(default)]
    id: String,
    #[serde(default)]
    password: String,
}

pub async fn admin_remove(
    State(state): State<Arc<AppState>>,
    Json(input): Json<RemoveInput>,
) -> Response {
    if let Err(e) = require_admin(&state, &input.password) {
        return rejection(&state, e);
    }
    if input.id.trim().is_empty() {
        return rejection(&state, ValidationError::MissingField("id").into());
    }
    match state.store.remove(&input.id) {
        Ok(true) => Json(json!({
            "success": true,
            "message": state.catalog.text("student_removed"),
        }))
        .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "message": state.catalog.text("student_not_found"),
            })),
        )
            .into_response(),
        Err(e) => rejection(&state, AppError::Internal(e)),
    }
}

/// QR code page linking to the public registration form.
pub async fn qr_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let url = qr::registration_url(state.public_base.as_deref(), &state.host, state.port);
    let svg = qr::qr_svg(&url)?;
    let page = register::render_qr(&state.templates, &state.catalog, &url, &svg)?;
    Ok(Html(page))
}

fn require_admin(state: &AppState, supplied: &str) -> Result<(), AppError> {
    if !state.catalog.settings.allows_admin(supplied) {
        return Err(ValidationError::WrongPassword.into());
    }
    Ok(())
}

fn rejection(state: &AppState, err: AppError) -> Response {
    let (status, key) = match &err {
        AppError::Invalid(ValidationError::WrongPassword) => {
            (StatusCode::UNAUTHORIZED, "wrong_password")
        }
        AppError::Invalid(ValidationError::MissingField(_)) => {
            (StatusCode::BAD_REQUEST, "missing_data")
        }
        AppError::Invalid(ValidationError::UnknownClass(_)) => {
            (StatusCode::BAD_REQUEST, "invalid_class")
        }
        AppError::Internal(e) => {
            warn!("request failed: {e:#}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "internal error" })),
            )
                .into_response();
        }
    };
    (
        status,
        Json(json!({ "success": false, "message": state.catalog.text(key) })),
    )
        .into_response()
}
