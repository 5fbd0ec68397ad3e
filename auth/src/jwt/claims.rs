use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claims carried by a bearer token.
///
/// Binds a subject (the user's email) to an issue time and an expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token identifier; keeps tokens minted in the same second distinct.
    pub jti: String,
}

impl Claims {
    /// Create claims for `subject` issued at `now` and valid for `ttl`.
    ///
    /// Timestamps have whole-second resolution; a fractional `ttl` is rounded
    /// up so that any positive lifetime outlives the second it was issued in.
    pub fn new(subject: impl ToString, ttl: Duration, now: DateTime<Utc>) -> Self {
        let issued_at = now.timestamp();

        Self {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime_seconds(ttl)),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the instant `exp` is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

fn lifetime_seconds(ttl: Duration) -> i64 {
    let whole = ttl.num_seconds();
    if ttl > Duration::seconds(whole) {
        whole.saturating_add(1)
    } else {
        whole
    }
}
