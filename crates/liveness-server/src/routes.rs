use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::header::{CONTENT_TYPE, SET_COOKIE},
    response::{AppendHeaders, Html, IntoResponse, Response},
    Form, Json,
};
use liveness_core::{LivenessError, Resolution};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::auth::{session_cookies, PresentedCredentials};
use crate::error::ApiError;
use crate::state::AppState;

type AppResult<T> = Result<T, ApiError>;

pub async fn create_session_handler(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let session_id = state.orchestrator.create_session().await?;
    Ok(Json(json!({ "session_id": session_id })).into_response())
}

pub async fn result_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Response> {
    let resolution = state.orchestrator.resolve(&session_id).await?;
    debug!(
        session_id = %session_id,
        status = %resolution.status(),
        cached = resolution.is_cached(),
        "resolved session"
    );

    let response = match resolution {
        Resolution::Cached(record) | Resolution::Captured(record) => Json(record).into_response(),
        Resolution::Pending(status) => Json(json!({ "status": status })).into_response(),
    };
    Ok(response)
}

pub async fn image_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Response> {
    let bytes = state
        .store()
        .read_image(&session_id)
        .await
        .map_err(|e| ApiError::not_found_as(e, "Image not found"))?;

    Ok(([(CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

pub async fn details_handler(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Html<String>> {
    let record = state
        .store()
        .read(&session_id)
        .await
        .map_err(|e| ApiError::not_found_as(e, "Details not found"))?;

    let image = match state.store().read_image(&session_id).await {
        Ok(bytes) => Some(bytes),
        Err(LivenessError::NotFound { .. }) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(Html(state.renderer.details(&record, image.as_deref())?))
}

pub async fn index_handler(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    let sessions = state.store().list().await?;
    Ok(Html(state.renderer.index(&sessions)?))
}

pub async fn login_form_handler(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    Ok(Html(state.renderer.login()?))
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AppResult<Response> {
    let Form(form) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let credentials = PresentedCredentials::new(form.username, form.password);

    if !state.gate.authorize(&credentials) {
        warn!(username = %credentials.username, "login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    info!(username = %credentials.username, "operator logged in");
    let [username_cookie, password_cookie] = session_cookies(&credentials);
    Ok((
        AppendHeaders([(SET_COOKIE, username_cookie), (SET_COOKIE, password_cookie)]),
        Json(json!({ "message": "Login successful" })),
    )
        .into_response())
}
