//! # Directory Client
//!
//! HTTP client for the employee API and the state machine of the directory
//! view that renders its results.

use thiserror::Error;

pub mod http;
pub mod view;

pub use http::{DirectoryClient, EmployeeSource};
pub use view::{AreaGroup, CloseReason, DirectoryView, ViewState, group_by_area, render_area};

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request exceeded the client timeout
    #[error("The request took too long")]
    Timeout,

    /// Non-2xx response; carries the server's message when it sent one
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Network or decoding failure
    #[error("{0}")]
    Http(reqwest::Error),

    /// Base URL could not be parsed
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error)
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
