use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;

use crate::{
    error::Result,
    models::session::SessionRecord,
    services::cookie,
    state::AppState,
    validation::auth::validate_web_id,
};

/// The request payload posted after the identity provider redirects back.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub web_id: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Session lifetime in seconds. Absent or zero means the default.
    pub expires_in: Option<u64>,
}

/// What the browser needs to start the identity provider's redirect flow.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginConfigResponse {
    pub oidc_issuer: String,
    pub redirect_url: String,
    pub client_name: String,
}

/// The response payload for a stored session.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    pub success: bool,
    pub web_id: String,
}

/// The public view of the current session. Tokens are never included.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub is_logged_in: bool,
    pub web_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// The response payload for logout.
#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Returns the identity provider configuration.
#[axum::debug_handler]
pub async fn login(State(state): State<AppState>) -> Json<LoginConfigResponse> {
    Json(LoginConfigResponse {
        oidc_issuer: state.config.oidc_issuer.clone(),
        redirect_url: state.config.redirect_url.clone(),
        client_name: state.config.client_name.clone(),
    })
}

/// Stores the session handed over after a successful login.
#[axum::debug_handler]
pub async fn callback(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<CallbackRequest>,
) -> Result<Response> {
    let web_id = validate_web_id(payload.web_id.as_deref())?;

    let session = SessionRecord::new(web_id, payload.expires_in)
        .with_tokens(payload.access_token, payload.refresh_token);

    cookie::store_session(&cookies, &state.codec, &session, state.config.is_production)?;

    tracing::info!("✅ Session created for: {}", session.subject_id);

    let response = CallbackResponse {
        success: true,
        web_id: session.subject_id,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Reports whether the caller holds a valid session.
#[axum::debug_handler]
pub async fn session(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Json<SessionStatusResponse> {
    let response = match cookie::load_session(&cookies, &state.codec).active() {
        Some(session) => SessionStatusResponse {
            is_logged_in: true,
            web_id: Some(session.subject_id),
            expires_at: Some(session.expires_at),
        },
        None => SessionStatusResponse {
            is_logged_in: false,
            web_id: None,
            expires_at: None,
        },
    };

    Json(response)
}

/// Deletes the session cookie.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Json<LogoutResponse> {
    cookie::clear_session(&cookies);

    tracing::info!("👋 Session cookie cleared");

    Json(LogoutResponse { success: true })
}
