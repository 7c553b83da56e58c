//! Remote bridge error types

use serde::Serialize;
use thiserror::Error;

/// Remote failure with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Timeout, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Auth, message)
    }

    pub fn quota(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Quota, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Server, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::InvalidRequest, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::MalformedResponse, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// Connection refused, DNS, reset
    Network,
    /// No reply within the configured timeout
    Timeout,
    /// Rejected credential (401, 403)
    Auth,
    /// Rate limited or out of quota (429)
    Quota,
    /// Provider-side failure (5xx)
    Server,
    /// Provider rejected the request (400)
    InvalidRequest,
    /// Reply could not be understood or carried no text
    MalformedResponse,
}

impl RemoteErrorKind {
    /// Short tag shown to the user inside the persona's apology
    pub fn tag(self) -> &'static str {
        match self {
            Self::Network => "red",
            Self::Timeout => "tiempo",
            Self::Auth => "llave",
            Self::Quota => "cuota",
            Self::Server => "servidor",
            Self::InvalidRequest => "petición",
            Self::MalformedResponse => "respuesta",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_message() {
        let err = RemoteError::quota("Rate limit exceeded: slow down");
        assert_eq!(err.to_string(), "Rate limit exceeded: slow down");
        assert_eq!(err.kind, RemoteErrorKind::Quota);
    }

    #[test]
    fn test_tags_are_short_and_distinct() {
        let kinds = [
            RemoteErrorKind::Network,
            RemoteErrorKind::Timeout,
            RemoteErrorKind::Auth,
            RemoteErrorKind::Quota,
            RemoteErrorKind::Server,
            RemoteErrorKind::InvalidRequest,
            RemoteErrorKind::MalformedResponse,
        ];
        let tags: std::collections::HashSet<_> = kinds.iter().map(|k| k.tag()).collect();
        assert_eq!(tags.len(), kinds.len());
        assert!(tags.iter().all(|t| t.chars().count() <= 10));
    }
}
