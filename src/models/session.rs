use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Lifetime of a session created without an explicit `expires_in`, in seconds.
pub const DEFAULT_SESSION_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

/// Represents an authenticated session as carried inside the session cookie.
///
/// The serialized field names (`webId`, `accessToken`, `refreshToken`, `expiresAt`)
/// are part of the cookie format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// The WebID of the authenticated principal.
    #[serde(rename = "webId")]
    pub subject_id: String,
    /// Bearer credential for the user's Pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Credential for renewing `access_token`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absolute expiry instant, in milliseconds since the Unix epoch.
    pub expires_at: i64,
}

impl SessionRecord {
    /// Creates a session for `subject_id` that expires `expires_in` seconds from now,
    /// or after [`DEFAULT_SESSION_LIFETIME_SECS`] when no lifetime is given.
    pub fn new(subject_id: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self::issued_at(subject_id, expires_in, now_millis())
    }

    /// Same as [`SessionRecord::new`] with an explicit issue instant.
    pub fn issued_at(subject_id: impl Into<String>, expires_in: Option<u64>, now_ms: i64) -> Self {
        let lifetime_secs = expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_SESSION_LIFETIME_SECS);
        let lifetime_ms = i64::try_from(lifetime_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);

        Self {
            subject_id: subject_id.into(),
            access_token: None,
            refresh_token: None,
            expires_at: now_ms.saturating_add(lifetime_ms),
        }
    }

    /// Attaches the tokens handed over by the identity provider.
    pub fn with_tokens(mut self, access_token: Option<String>, refresh_token: Option<String>) -> Self {
        self.access_token = access_token;
        self.refresh_token = refresh_token;
        self
    }

    /// Whether the session is past its expiry at the current wall-clock time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    /// Whether the session is past its expiry at `now_ms`. No grace period.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at < now_ms
    }

    /// Whole seconds left before expiry at `now_ms`, rounded up, never negative.
    pub fn remaining_secs_at(&self, now_ms: i64) -> i64 {
        let remaining_ms = self.expires_at.saturating_sub(now_ms).max(0);
        remaining_ms.saturating_add(999) / 1000
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEB_ID: &str = "https://pod.example/alice/profile/card#me";

    #[test]
    fn default_lifetime_is_seven_days() {
        let before = now_millis();
        let record = SessionRecord::new(WEB_ID, None);
        let after = now_millis();

        let week_ms = 7 * 24 * 3600 * 1000;
        assert!(record.expires_at >= before + week_ms);
        assert!(record.expires_at <= after + week_ms);
        assert!(record.access_token.is_none());
        assert!(record.refresh_token.is_none());
    }

    #[test]
    fn explicit_lifetime_in_seconds() {
        let record = SessionRecord::issued_at(WEB_ID, Some(3600), 1_700_000_000_000);
        assert_eq!(record.expires_at, 1_700_000_000_000 + 3_600_000);
    }

    #[test]
    fn zero_lifetime_falls_back_to_default() {
        let record = SessionRecord::issued_at(WEB_ID, Some(0), 0);
        assert_eq!(record.expires_at, DEFAULT_SESSION_LIFETIME_SECS as i64 * 1000);
    }

    #[test]
    fn huge_lifetime_saturates() {
        let record = SessionRecord::issued_at(WEB_ID, Some(u64::MAX), 1_700_000_000_000);
        assert_eq!(record.expires_at, i64::MAX);
    }

    #[test]
    fn expiry_boundary() {
        let now = now_millis();

        let stale = SessionRecord { expires_at: now - 1, ..SessionRecord::new(WEB_ID, None) };
        assert!(stale.is_expired_at(now));
        assert!(stale.is_expired());

        let fresh = SessionRecord { expires_at: now + 1000 * 3600, ..SessionRecord::new(WEB_ID, None) };
        assert!(!fresh.is_expired());

        let exact = SessionRecord { expires_at: now, ..SessionRecord::new(WEB_ID, None) };
        assert!(!exact.is_expired_at(now));
    }

    #[test]
    fn remaining_secs_rounds_up_and_floors_at_zero() {
        let record = SessionRecord::issued_at(WEB_ID, Some(10), 0);
        assert_eq!(record.remaining_secs_at(0), 10);
        assert_eq!(record.remaining_secs_at(1), 10);
        assert_eq!(record.remaining_secs_at(9_001), 1);
        assert_eq!(record.remaining_secs_at(10_000), 0);
        assert_eq!(record.remaining_secs_at(20_000), 0);
    }

    #[test]
    fn with_tokens_sets_both() {
        let record = SessionRecord::new(WEB_ID, None)
            .with_tokens(Some("at".into()), None);
        assert_eq!(record.access_token.as_deref(), Some("at"));
        assert!(record.refresh_token.is_none());
    }
}
