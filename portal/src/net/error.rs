//! Client error taxonomy.

use crate::state::session::LoginTokenError;
use crate::state::storage::StorageError;

/// Error returned by API calls and page actions.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered 401. The session has already been torn down.
    #[error("authentication required: {message}")]
    Auth { message: String },

    /// Any other non-success response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// A success response whose body did not match the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A form failed local validation before any request was sent.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The login response carried a token the client cannot read.
    #[error("login returned an unreadable token: {0}")]
    Token(#[from] super::token::DecodeError),

    /// The session could not be written to durable storage.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "E_AUTH",
            Self::Api { .. } => "E_API",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Parse(_) => "E_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Validation { .. } => "E_VALIDATION",
            Self::Token(_) => "E_TOKEN",
            Self::Storage(_) => "E_STORAGE",
        }
    }

    /// Whether the session was invalidated by this failure.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

impl From<LoginTokenError> for ClientError {
    fn from(e: LoginTokenError) -> Self {
        match e {
            LoginTokenError::Decode(e) => Self::Token(e),
            LoginTokenError::Storage(e) => Self::Storage(e),
        }
    }
}
