/// Responses for requests no handler matches
use crate::error::ServerError;
use axum::http::{Method, Uri};

/// Router fallback: unknown path
pub async fn no_route(method: Method, uri: Uri) -> ServerError {
    ServerError::NoRoute(format!("{} {}", method, uri.path()))
}

/// Method router fallback: known path, unsupported verb
pub async fn method_not_allowed(method: Method, uri: Uri) -> ServerError {
    ServerError::MethodNotAllowed(format!("{} {}", method, uri.path()))
}
