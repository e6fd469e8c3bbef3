//! Ways a reader proxy request can fail.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid target url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("could not build reader client: {0}")]
    Client(String),

    /// DNS, refused or reset connections to the reader.
    #[error("could not reach reader: {0}")]
    Connect(String),

    #[error("reader timed out (connecting: {connecting})")]
    Timeout { connecting: bool },

    #[error("reader redirected too many times")]
    RedirectLoop,

    #[error("reader answered {status}")]
    Status { status: StatusCode, retriable: bool },

    #[error("reader body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("reader sent unsupported content-type '{0}'")]
    UnsupportedContentType(String),

    #[error("could not decode reader body: {0}")]
    Charset(String),

    #[error("reader body was cut off: {0}")]
    Body(String),

    #[error("reader request failed: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Transient failures worth another attempt.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Connect(_) | Self::Timeout { .. } | Self::Body(_) | Self::Unknown(_) => true,
            Self::Status { retriable, .. } => *retriable,
            Self::InvalidUrl(_)
            | Self::Client(_)
            | Self::RedirectLoop
            | Self::BodyTooLarge(_)
            | Self::UnsupportedContentType(_)
            | Self::Charset(_) => false,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                connecting: err.is_connect(),
            };
        }
        if err.is_redirect() {
            return Self::RedirectLoop;
        }
        if let Some(status) = err.status() {
            return Self::Status {
                status,
                retriable: is_retriable_status(status),
            };
        }
        if err.is_connect() || err.is_request() {
            return Self::Connect(err.to_string());
        }
        if err.is_body() || err.is_decode() {
            return Self::Body(err.to_string());
        }
        Self::Unknown(err.to_string())
    }
}

/// Server errors and rate limiting from the reader proxy are worth another try.
pub fn is_retriable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
