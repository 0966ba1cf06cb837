/// Roster Server - user CRUD over a tunable Postgres pool
use clap::{Args, Parser, Subcommand};
use roster_server::{create_router, AppState, ConfigOverrides, ServerConfig};
use roster_storage::PgUserService;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "User CRUD service for exercising Postgres pool limits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        database: DatabaseArgs,

        /// Port to listen on
        #[arg(short, long, env = "ROSTER_PORT")]
        port: Option<u16>,
    },
    /// Check connectivity and print pool statistics
    Ping {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

#[derive(Args)]
struct DatabaseArgs {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PostgreSQL connection string
    #[arg(long, env = "ROSTER_DSN")]
    dsn: Option<String>,

    /// Cap open connections
    #[arg(long)]
    conn_limits: bool,

    /// Cap idle connections
    #[arg(long)]
    idle_limits: bool,

    /// Open-connection cap used with --conn-limits
    #[arg(long)]
    max_open: Option<u32>,

    /// Idle-connection cap used with --idle-limits
    #[arg(long)]
    max_idle: Option<u32>,
}

impl DatabaseArgs {
    fn load_config(self, port: Option<u16>) -> anyhow::Result<ServerConfig> {
        let mut config = ServerConfig::load(self.config.as_deref())?;
        config.apply_overrides(ConfigOverrides {
            database_url: self.dsn,
            port,
            conn_limits: self.conn_limits,
            idle_limits: self.idle_limits,
            max_open_connections: self.max_open,
            max_idle_connections: self.max_idle,
        });
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "roster_server=info,roster_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { database, port } => {
            serve(database.load_config(port)?).await?;
        }
        Commands::Ping { database } => {
            ping(database.load_config(None)?).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Roster Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Fails fast: no retry if the store is unreachable at start-up
    let pool = roster_storage::connect(&config.pool_settings()).await?;
    tracing::info!("Database connected");

    let users = Arc::new(PgUserService::new(pool.clone()));
    let app = create_router(AppState::new(users));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pool");
    pool.close().await;

    Ok(())
}

async fn ping(config: ServerConfig) -> anyhow::Result<()> {
    let pool = roster_storage::connect(&config.pool_settings()).await?;
    let stats = roster_storage::pool_stats(&pool, &roster_storage::WaitStats::default());

    println!("Database reachable");
    println!("  open connections: {}", stats.open_connections);
    println!("  in use:           {}", stats.in_use);
    println!("  idle:             {}", stats.idle);
    println!("  max open:         {}", stats.max_open_connections);

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
