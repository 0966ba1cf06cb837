//! Connection manager
//!
//! Opens the Postgres pool, applies the optional open/idle limits and runs the
//! start-up liveness check.

use crate::deadline::{with_deadline, LIVENESS_DEADLINE};
use roster_core::{PoolStats, Result, RosterError};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, Postgres};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Open-connection cap used when connection limits are disabled
///
/// The pool must be bounded, so "unlimited" means the Postgres server default.
pub const UNLIMITED_OPEN_CONNECTIONS: u32 = 100;

/// Cap applied by `--conn-limits` / `--idle-limits` unless configured otherwise
pub const DEFAULT_CONNECTION_LIMIT: u32 = 5;

/// How long surplus idle connections survive when idle limits are on
const IDLE_REAP_TIMEOUT: Duration = Duration::from_secs(1);

/// Pool settings
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Postgres connection string
    pub database_url: String,

    /// Cap open connections at `max_open_connections`
    pub conn_limits: bool,

    /// Open-connection cap when `conn_limits` is set
    pub max_open_connections: u32,

    /// Cap retained idle connections at `max_idle_connections`
    pub idle_limits: bool,

    /// Idle-connection cap when `idle_limits` is set
    pub max_idle_connections: u32,

    /// How long a caller waits for a pooled connection
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    /// Settings with both limits disabled
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            conn_limits: false,
            max_open_connections: DEFAULT_CONNECTION_LIMIT,
            idle_limits: false,
            max_idle_connections: DEFAULT_CONNECTION_LIMIT,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Enable the open-connection cap
    pub fn with_conn_limit(mut self, max_open: u32) -> Self {
        self.conn_limits = true;
        self.max_open_connections = max_open;
        self
    }

    /// Enable the idle-connection cap
    pub fn with_idle_limit(mut self, max_idle: u32) -> Self {
        self.idle_limits = true;
        self.max_idle_connections = max_idle;
        self
    }

    /// Set the acquire timeout
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Effective open-connection cap
    pub fn effective_max_open(&self) -> u32 {
        if self.conn_limits {
            self.max_open_connections
        } else {
            UNLIMITED_OPEN_CONNECTIONS
        }
    }

    /// Effective idle cap, never above the open cap
    pub fn effective_max_idle(&self) -> Option<u32> {
        self.idle_limits
            .then(|| self.max_idle_connections.min(self.effective_max_open()))
    }

    /// Translate the settings into sqlx pool options
    ///
    /// sqlx has no direct "max idle" knob: the idle cap is kept as warm
    /// connections (`min_connections`) and anything above it is reaped after
    /// `IDLE_REAP_TIMEOUT`.
    pub fn pool_options(&self) -> PgPoolOptions {
        let mut options = PgPoolOptions::new()
            .max_connections(self.effective_max_open())
            .acquire_timeout(self.acquire_timeout);

        if let Some(max_idle) = self.effective_max_idle() {
            options = options
                .min_connections(max_idle)
                .idle_timeout(IDLE_REAP_TIMEOUT);
        }

        options
    }
}

/// Open the pool and verify the store is reachable
///
/// The pool is created lazily, then a `SELECT 1` must succeed within
/// `LIVENESS_DEADLINE`. On failure the pool is closed and the error returned;
/// there is no retry.
///
/// # Errors
///
/// - `InvalidInput` if the connection string cannot be parsed
/// - `Timeout` if the liveness check does not finish in time
/// - `Unavailable` / `Storage` if the check fails
pub async fn connect(settings: &PoolSettings) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&settings.database_url)
        .map_err(|e| RosterError::invalid_input(format!("invalid database URL: {e}")))?;

    tracing::info!(
        host = connect_options.get_host(),
        port = connect_options.get_port(),
        database = connect_options.get_database().unwrap_or_default(),
        max_open = settings.effective_max_open(),
        max_idle = ?settings.effective_max_idle(),
        "Creating database pool"
    );

    let pool = settings.pool_options().connect_lazy_with(connect_options);

    if let Err(e) = liveness_check(&pool).await {
        tracing::error!("Database liveness check failed: {}", e);
        pool.close().await;
        return Err(e);
    }

    tracing::info!("Database pool ready");
    Ok(pool)
}

/// Run `SELECT 1` under the liveness deadline
pub async fn liveness_check(pool: &PgPool) -> Result<()> {
    with_deadline(
        "liveness check",
        LIVENESS_DEADLINE,
        sqlx::query("SELECT 1").execute(pool),
    )
    .await?;
    Ok(())
}

/// Time callers spent blocked on a saturated pool
///
/// sqlx does not keep these numbers, so they are recorded around each
/// checkout made through [`acquire`]. Connections closed by the idle reaper
/// are not counted anywhere.
#[derive(Debug, Default)]
pub struct WaitStats {
    count: AtomicU64,
    micros: AtomicU64,
}

impl WaitStats {
    /// Record one wait
    pub fn record(&self, waited: Duration) {
        let micros = u64::try_from(waited.as_micros()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.micros.fetch_add(micros, Ordering::Relaxed);
    }

    /// Number of waits recorded
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Sum of all recorded waits
    pub fn total(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::Relaxed))
    }
}

/// Records the wait on drop, so checkouts cut short by a deadline still count
struct WaitTimer<'a> {
    waits: &'a WaitStats,
    started: Instant,
}

impl Drop for WaitTimer<'_> {
    fn drop(&mut self) {
        self.waits.record(self.started.elapsed());
    }
}

/// Check a connection out of the pool
///
/// When every connection is open and none is idle the caller has to wait for
/// a release; that wait is added to `waits`.
pub async fn acquire(
    pool: &PgPool,
    waits: &WaitStats,
) -> std::result::Result<PoolConnection<Postgres>, sqlx::Error> {
    let saturated =
        pool.num_idle() == 0 && pool.size() >= pool.options().get_max_connections();
    let _timer = saturated.then(|| WaitTimer {
        waits,
        started: Instant::now(),
    });

    pool.acquire().await
}

/// Snapshot of the pool's current usage
pub fn pool_stats(pool: &PgPool, waits: &WaitStats) -> PoolStats {
    let open_connections = pool.size();
    let idle = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX).min(open_connections);

    PoolStats {
        open_connections,
        in_use: open_connections - idle,
        idle,
        max_open_connections: pool.options().get_max_connections(),
        wait_count: waits.count(),
        wait_duration_ms: u64::try_from(waits.total().as_millis()).unwrap_or(u64::MAX),
    }
}
