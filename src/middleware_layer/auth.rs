use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::AppError,
    services::cookie::{self, SessionLookup},
    state::AppState,
};

/// A middleware that requires a valid, unexpired session cookie.
///
/// On success the [`SessionRecord`](crate::models::session::SessionRecord) is inserted
/// into the request extensions. Expired sessions have their cookie deleted.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`, or `AppError::Authentication` (401) without a usable session.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let session = match cookie::load_session(&cookies, &state.codec) {
        SessionLookup::Active(session) => session,
        SessionLookup::Expired(session) => {
            tracing::warn!("❌ Session expired for: {}", session.subject_id);
            return Err(unauthenticated());
        }
        SessionLookup::Absent => {
            tracing::warn!("❌ No valid session cookie found");
            return Err(unauthenticated());
        }
    };

    tracing::debug!("✅ User authenticated: {}", session.subject_id);

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

fn unauthenticated() -> AppError {
    AppError::Authentication("Unauthorized - not authenticated".to_string())
}
