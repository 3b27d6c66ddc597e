use thiserror::Error;

/// Top-level error type for the `unifi-led-api` crate.
///
/// The six controller operations never hand these to the caller; they log
/// the error and resolve to `None` / `false`. Construction, `connect`, and
/// the request plumbing surface them directly.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, non-2xx status, missing token).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The controller answered 403 and the single re-login attempt failed.
    #[error("Re-authentication after HTTP 403 failed")]
    ReauthenticationFailed,

    /// The controller answered 403. `execute` recovers from the first one by
    /// logging in again; the caller only sees this when the replay after a
    /// successful re-login is rejected too.
    #[error("Forbidden (HTTP 403)")]
    Forbidden,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Any non-2xx status other than 403.
    #[error("Controller API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Brightness outside `0..=100`.
    #[error("Brightness {0} is out of range (0-100)")]
    InvalidBrightness(u8),
}

impl Error {
    /// Returns `true` if this error indicates the bearer token was rejected
    /// and a fresh login might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::ReauthenticationFailed | Self::Forbidden
        )
    }

    /// Returns `true` if this is a transient transport error.
    ///
    /// Nothing in this crate retries on it; callers layering their own
    /// retry policy can use it.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Forbidden => Some(403),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
