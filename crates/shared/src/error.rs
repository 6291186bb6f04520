use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    InvalidParameter,
    NetworkUnavailable,
    NotFound,
    ServerError,
    MalformedResponse,
}

/// Failure of a single collection fetch, classified at the fetch boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid identifier")]
    InvalidParameter,
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),
    #[error("server responded with status {status}")]
    ServerError { status: u16 },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidParameter => FetchErrorKind::InvalidParameter,
            Self::NetworkUnavailable(_) => FetchErrorKind::NetworkUnavailable,
            Self::ServerError { status: 404 } => FetchErrorKind::NotFound,
            Self::ServerError { .. } => FetchErrorKind::ServerError,
            Self::MalformedResponse(_) => FetchErrorKind::MalformedResponse,
        }
    }

    /// Short text shown in place of the list. Never carries transport detail.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidParameter => "invalid identifier".to_string(),
            Self::NetworkUnavailable(_) => "server unreachable".to_string(),
            Self::ServerError { status: 404 } => "not found".to_string(),
            Self::ServerError { status } => format!("server error (status {status})"),
            Self::MalformedResponse(_) => "malformed response".to_string(),
        }
    }
}
