use tower_cookies::cookie::{time::Duration, SameSite};
use tower_cookies::{Cookie, Cookies};

use crate::error::Result;
use crate::models::session::{now_millis, SessionRecord};
use crate::services::session::{Decoded, SessionCodec};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "solid-session";

/// Upper bound on the session cookie's `Max-Age`, in seconds (7 days).
pub const SESSION_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// What a request's session cookie turned out to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    /// A valid, unexpired session.
    Active(SessionRecord),
    /// A valid session past its expiry. The cookie has been deleted.
    Expired(SessionRecord),
    /// No cookie, or a cookie that did not decode.
    Absent,
}

impl SessionLookup {
    /// Returns the record of an active session.
    pub fn active(self) -> Option<SessionRecord> {
        match self {
            SessionLookup::Active(record) => Some(record),
            SessionLookup::Expired(_) | SessionLookup::Absent => None,
        }
    }
}

/// Builds the session cookie for `value`.
///
/// `Max-Age` follows the record's own expiry, capped at seven days.
fn create_session_cookie(
    value: String,
    record: &SessionRecord,
    secure: bool,
    now_ms: i64,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, value);

    cookie.set_http_only(true);

    if secure {
        cookie.set_secure(true);
    }

    cookie.set_same_site(SameSite::Lax);
    let max_age = record
        .remaining_secs_at(now_ms)
        .min(SESSION_COOKIE_MAX_AGE_SECS);
    cookie.set_max_age(Duration::seconds(max_age));
    cookie.set_path("/");

    cookie
}

/// Encodes `record` and stores it in the session cookie, replacing any prior one.
pub fn store_session(
    cookies: &Cookies,
    codec: &SessionCodec,
    record: &SessionRecord,
    secure: bool,
) -> Result<()> {
    let token = codec.encode(record)?;
    cookies.add(create_session_cookie(token, record, secure, now_millis()));
    Ok(())
}

/// Deletes the session cookie.
pub fn clear_session(cookies: &Cookies) {
    let mut session_cookie = Cookie::new(SESSION_COOKIE_NAME, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);
}

/// Reads the session cookie.
///
/// An expired session deletes the cookie so the stale token is not validated again.
pub fn load_session(cookies: &Cookies, codec: &SessionCodec) -> SessionLookup {
    let Some(cookie) = cookies.get(SESSION_COOKIE_NAME) else {
        return SessionLookup::Absent;
    };

    if cookie.value().is_empty() {
        return SessionLookup::Absent;
    }

    let record = match codec.decode(cookie.value()) {
        Decoded::Valid(record) => record,
        Decoded::Invalid => return SessionLookup::Absent,
    };

    if record.is_expired() {
        tracing::info!("⌛ Session expired for: {}", record.subject_id);
        clear_session(cookies);
        return SessionLookup::Expired(record);
    }

    SessionLookup::Active(record)
}
