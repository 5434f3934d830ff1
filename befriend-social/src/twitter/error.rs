use befriend_http::{HttpError, StatusCode};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("pagination error: {0}")]
    Pagination(String),
}

/// Coarse classification of a failed call, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limit or follow limit reached (429, codes 88 and 161).
    RateLimited,
    /// Twitter refused the action (403, codes 160 and 162).
    Refused,
    /// Target account is gone or suspended (404, codes 50 and 63).
    Unavailable,
    /// Credentials rejected (401, codes 32 and 89).
    Unauthorized,
    /// The request never got a response.
    Transport,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::RateLimited => "rate limited",
            FailureKind::Refused => "refused",
            FailureKind::Unavailable => "unavailable",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Transport => "transport",
            FailureKind::Other => "other",
        };
        f.write_str(s)
    }
}

impl TwitterError {
    pub fn kind(&self) -> FailureKind {
        let http = match self {
            TwitterError::Http(e) => e,
            TwitterError::Pagination(_) => return FailureKind::Other,
        };
        match http {
            HttpError::Network(_) => return FailureKind::Transport,
            HttpError::Api { .. } => {}
            _ => return FailureKind::Other,
        }

        // Error codes are more specific than statuses (161 comes back as a 403).
        match http.api_code() {
            Some(88 | 161) => return FailureKind::RateLimited,
            Some(32 | 89) => return FailureKind::Unauthorized,
            Some(50 | 63) => return FailureKind::Unavailable,
            Some(160 | 162) => return FailureKind::Refused,
            _ => {}
        }
        match http.status() {
            Some(StatusCode::TOO_MANY_REQUESTS) => FailureKind::RateLimited,
            Some(StatusCode::UNAUTHORIZED) => FailureKind::Unauthorized,
            Some(StatusCode::NOT_FOUND) => FailureKind::Unavailable,
            Some(StatusCode::FORBIDDEN) => FailureKind::Refused,
            _ => FailureKind::Other,
        }
    }
}
