//! User service contract
//!
//! Every backing store implements [`UserService`]; the HTTP layer only ever
//! sees a trait object, so stores are interchangeable (Postgres in production,
//! an in-memory double in tests).

use crate::error::Result;
use crate::types::{NewUser, User, UserChanges, UserId};
use async_trait::async_trait;
use serde::Serialize;

/// Snapshot of connection pool usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Connections currently open (idle + in use)
    pub open_connections: u32,

    /// Connections checked out by callers
    pub in_use: u32,

    /// Connections sitting idle in the pool
    pub idle: u32,

    /// Upper bound on open connections
    pub max_open_connections: u32,

    /// Checkouts that found the pool saturated and had to wait
    pub wait_count: u64,

    /// Total time spent in those waits, in milliseconds
    pub wait_duration_ms: u64,
}

/// Data-access contract for user records
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetch a user by ID
    ///
    /// # Errors
    /// `NotFound` if no user has this ID
    async fn get(&self, id: &UserId) -> Result<User>;

    /// Delete a user by ID
    ///
    /// # Errors
    /// `NotFound` if no row was removed
    async fn delete(&self, id: &UserId) -> Result<()>;

    /// Delete every user, returning how many rows were removed
    ///
    /// Succeeds on an empty store.
    async fn delete_all(&self) -> Result<u64>;

    /// Replace a user's name and occupation
    ///
    /// Returns the stored record with a refreshed `updated_at`.
    ///
    /// # Errors
    /// `NotFound` if no user has this ID
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User>;

    /// Insert a new user with a freshly generated ID and timestamps
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Connection pool usage, for stores that have one
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}
