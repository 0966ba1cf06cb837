//! Per-operation deadlines for store calls

use roster_core::{Result, RosterError};
use std::future::Future;
use std::time::Duration;

/// Deadline applied to every data-access operation
pub const OPERATION_DEADLINE: Duration = Duration::from_secs(15);

/// Deadline for the start-up liveness check
pub const LIVENESS_DEADLINE: Duration = Duration::from_secs(5);

/// Run a store future, failing with `RosterError::Timeout` once `deadline` elapses
///
/// The future is dropped on timeout, which releases any pooled connection it
/// was holding.
pub async fn with_deadline<T, E, F>(operation: &'static str, deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Into<RosterError>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            tracing::warn!(
                operation,
                deadline_secs = deadline.as_secs(),
                "Store operation exceeded deadline"
            );
            Err(RosterError::timeout(operation, deadline))
        }
    }
}
