/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no route for {0}")]
    NoRoute(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

impl ServerError {
    /// Status code for this error
    ///
    /// One mapping for every handler: 400 bad input, 404 not found,
    /// 408 deadline exceeded, 503 store unreachable, 500 anything else.
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NoRoute(_) => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Roster(err) => match err {
                RosterError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                RosterError::NotFound(_) => StatusCode::NOT_FOUND,
                RosterError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
                RosterError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RosterError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Configuration error".to_string()
            }
            ServerError::Roster(RosterError::Storage(ref msg)) => {
                tracing::error!("Database error: {}", msg);
                "Database error".to_string()
            }
            ServerError::Roster(ref err @ RosterError::Unavailable(_)) => {
                tracing::error!("Store unavailable: {}", err);
                err.to_string()
            }
            ServerError::Roster(ref err @ RosterError::Timeout { .. }) => {
                tracing::warn!("{}", err);
                err.to_string()
            }
            ServerError::BadRequest(msg) => msg,
            err @ (ServerError::NoRoute(_) | ServerError::MethodNotAllowed(_)) => err.to_string(),
            ServerError::Roster(err) => err.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
