// File: src/error.rs
// Purpose: Faults raised while constructing or executing an action result

use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between a handler returning a result and the
/// response being complete.
///
/// Results never log or recover from these; the executor decides what the
/// client sees.
#[derive(Error, Debug)]
pub enum ResultError {
    /// The result was built from an argument it cannot work with.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The sink already sent its head when a result tried to change it.
    #[error("The response has already started")]
    AlreadyStarted,

    /// The transport failed underneath a write.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("The view '{name}' was not found. The following locations were searched: {}", .searched.join(", "))]
    ViewNotFound { name: String, searched: Vec<String> },

    #[error("A view component named '{0}' could not be found")]
    ComponentNotFound(String),

    #[error("No route matches the supplied values: {0}")]
    NoRouteMatch(String),

    #[error("Could not find file: {}", .0.display())]
    FileNotFound(PathBuf),
}

impl ResultError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ResultError::InvalidArgument(message.into())
    }

    /// Status reported to the client when this fault ends a request before
    /// anything was sent.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResultError::FileNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
