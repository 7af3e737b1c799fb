use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity token payload.
///
/// Carries the subject (user identifier), the issue time and an optional
/// expiration. Tokens without `exp` never expire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for a subject issued now.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `lifetime` - Time until the token expires, `None` for no expiry
    ///
    /// # Returns
    /// Claims with sub and iat set, and exp when a lifetime is given
    pub fn for_subject(subject: impl ToString, lifetime: Option<Duration>) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: lifetime.map(|lifetime| (now + lifetime).timestamp()),
        }
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }
}
