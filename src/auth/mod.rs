/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Why a request was denied. Only ever logged, never returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No key, or an empty one
    Missing,
    /// Key present but wrong
    Invalid,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Missing => "missing",
            DenyReason::Invalid => "invalid",
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(DenyReason),
}

/// Compares a presented key against the single configured secret.
///
/// The secret is fixed at construction. There are no per-user keys, no
/// expiry and no rate limiting.
#[derive(Clone)]
pub struct ApiKeyGuard {
    secret: String,
}

impl ApiKeyGuard {
    pub fn new(secret: impl Into<String>) -> Self {
        ApiKeyGuard {
            secret: secret.into(),
        }
    }

    /// Check a presented key.
    ///
    /// Missing or empty keys are denied even if the configured secret is empty.
    pub fn authorize(&self, presented: Option<&str>) -> Access {
        match presented {
            None | Some("") => Access::Deny(DenyReason::Missing),
            Some(key) if key == self.secret => Access::Allow,
            Some(_) => Access::Deny(DenyReason::Invalid),
        }
    }
}

impl std::fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGuard")
            .field("secret", &"<redacted>")
            .finish()
    }
}
