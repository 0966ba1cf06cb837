/// Core error types for Roster
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `RosterError`
pub type Result<T> = std::result::Result<T, RosterError>;

/// Core error type for Roster
#[derive(Error, Debug)]
pub enum RosterError {
    /// No row matched (zero rows returned or affected)
    #[error("user not found: {0}")]
    NotFound(String),

    /// A store operation ran past its deadline
    #[error("{operation} timed out after {}s", .deadline.as_secs())]
    Timeout {
        /// Name of the operation that was cut off
        operation: &'static str,
        /// The deadline that elapsed
        deadline: Duration,
    },

    /// The store could not be reached (connection, pool or transport failure)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Input rejected before reaching the store
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Any other store failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl RosterError {
    /// Create a not found error
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound(id.to_string())
    }

    /// Create a timeout error
    pub fn timeout(operation: &'static str, deadline: Duration) -> Self {
        Self::Timeout {
            operation,
            deadline,
        }
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

// SQLSTATE classes that mean the server is going away or refusing connections:
// 08 connection exception, 57P0x operator intervention, 53300 too many connections.
#[cfg(feature = "sqlx-support")]
fn is_unavailable_sqlstate(code: &str) -> bool {
    code.starts_with("08") || code.starts_with("57P0") || code == "53300"
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("no rows in result set".to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err.to_string()),
            sqlx::Error::Database(ref db_err)
                if db_err.code().is_some_and(|code| is_unavailable_sqlstate(&code)) =>
            {
                Self::Unavailable(err.to_string())
            }
            other => Self::Storage(other.to_string()),
        }
    }
}
