//! Postgres test fixtures backed by testcontainers

use anyhow::Result;
use roster_storage::{connect, PgUserService, PoolSettings, USERS_SCHEMA};
use sqlx::PgPool;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;

/// A running Postgres container with the users schema applied
pub struct TestDb {
    pub url: String,
    pub pool: PgPool,
    _container: ContainerAsync<Postgres>,
}

impl TestDb {
    /// Start a container and connect with the given pool limits
    pub async fn start_with(configure: impl FnOnce(PoolSettings) -> PoolSettings) -> Result<Self> {
        let container = Postgres::default().start().await?;
        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

        let pool = connect(&configure(PoolSettings::new(&url))).await?;
        sqlx::raw_sql(USERS_SCHEMA).execute(&pool).await?;

        Ok(Self {
            url,
            pool,
            _container: container,
        })
    }

    /// Start a container with pool limits disabled
    pub async fn start() -> Result<Self> {
        Self::start_with(|settings| settings).await
    }

    pub fn service(&self) -> PgUserService {
        PgUserService::new(self.pool.clone())
    }
}
