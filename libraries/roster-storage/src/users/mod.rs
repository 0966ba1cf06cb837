//! Postgres-backed user service

use crate::deadline::{with_deadline, OPERATION_DEADLINE};
use crate::pool::{self, WaitStats};
use async_trait::async_trait;
use roster_core::{
    NewUser, PoolStats, Result, RosterError, User, UserChanges, UserId, UserService,
};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgRow, Postgres};
use sqlx::Row;
use std::sync::Arc;
use std::time::Duration;

const SELECT_USER: &str = "
    SELECT id, name, occupation, created_at, updated_at
    FROM users
    WHERE id = $1";

const DELETE_USER: &str = "
    DELETE FROM users
    WHERE id = $1";

const DELETE_ALL_USERS: &str = "DELETE FROM users";

// updated_at always moves strictly forward, even if the server clock has not.
const UPDATE_USER: &str = "
    UPDATE users
    SET name = $2,
        occupation = $3,
        updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond')
    WHERE id = $1
    RETURNING id, name, occupation, created_at, updated_at";

const INSERT_USER: &str = "
    INSERT INTO users (id, name, occupation, created_at, updated_at)
    VALUES ($1, $2, $3, now(), now())
    RETURNING id, name, occupation, created_at, updated_at";

/// User service over a shared Postgres pool
///
/// Each call checks a connection out of the pool for a single statement and
/// returns it before completing. Clones share the pool and its wait counters.
#[derive(Debug, Clone)]
pub struct PgUserService {
    pool: PgPool,
    deadline: Duration,
    waits: Arc<WaitStats>,
}

impl PgUserService {
    /// Create a service using the standard operation deadline
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            deadline: OPERATION_DEADLINE,
            waits: Arc::default(),
        }
    }

    /// Override the per-operation deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn acquire(&self) -> std::result::Result<PoolConnection<Postgres>, sqlx::Error> {
        pool::acquire(&self.pool, &self.waits).await
    }
}

fn user_from_row(row: &PgRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        occupation: row.try_get("occupation")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserService for PgUserService {
    async fn get(&self, id: &UserId) -> Result<User> {
        let row = with_deadline(
            "get user",
            self.deadline,
            async {
                let mut conn = self.acquire().await?;
                sqlx::query(SELECT_USER).bind(id).fetch_optional(&mut *conn).await
            },
        )
        .await?
        .ok_or_else(|| RosterError::not_found(id))?;

        Ok(user_from_row(&row)?)
    }

    async fn delete(&self, id: &UserId) -> Result<()> {
        let result = with_deadline(
            "delete user",
            self.deadline,
            async {
                let mut conn = self.acquire().await?;
                sqlx::query(DELETE_USER).bind(id).execute(&mut *conn).await
            },
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(RosterError::not_found(id));
        }

        tracing::debug!(%id, "Deleted user");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = with_deadline(
            "delete all users",
            self.deadline,
            async {
                let mut conn = self.acquire().await?;
                sqlx::query(DELETE_ALL_USERS).execute(&mut *conn).await
            },
        )
        .await?;

        let deleted = result.rows_affected();
        tracing::debug!(deleted, "Deleted all users");
        Ok(deleted)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<User> {
        let row = with_deadline(
            "update user",
            self.deadline,
            async {
                let mut conn = self.acquire().await?;
                sqlx::query(UPDATE_USER)
                    .bind(id)
                    .bind(&changes.name)
                    .bind(&changes.occupation)
                    .fetch_optional(&mut *conn)
                    .await
            },
        )
        .await?
        .ok_or_else(|| RosterError::not_found(id))?;

        Ok(user_from_row(&row)?)
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let id = UserId::generate();

        let row = with_deadline(
            "create user",
            self.deadline,
            async {
                let mut conn = self.acquire().await?;
                sqlx::query(INSERT_USER)
                    .bind(id)
                    .bind(&new_user.name)
                    .bind(&new_user.occupation)
                    .fetch_one(&mut *conn)
                    .await
            },
        )
        .await?;

        let user = user_from_row(&row)?;
        tracing::debug!(id = %user.id, "Created user");
        Ok(user)
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(pool::pool_stats(&self.pool, &self.waits))
    }
}
