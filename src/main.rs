use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{Config, Environment, File, FileFormat};
use log::{LevelFilter, debug, info};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use campus_connect::api::{self, AppState};
use campus_connect::auth::{AuthConfig, AuthState};
use campus_connect::db::Database;
use campus_connect::storage::LocalStorage;

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn async_main(config: AppConfig, cmd: ServeCommand) -> Result<()> {
    handle_serve(config, cmd).await
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.common)?;

    let config = load_config(cli.common.config.as_deref())?;
    debug!("resolved config: {:#?}", config);

    match cli.command {
        Command::Serve(cmd) => async_main(config, cmd),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Campus Connect - campus marketplace backend with real-time chat.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Path to the configuration file
    #[arg(long, short, global = true, env = "CAMPUS_CONNECT_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP API and chat hub server
    Serve(ServeCommand),
}

#[derive(Debug, Clone, Args)]
struct ServeCommand {
    /// Host address to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config)
    #[arg(long, short)]
    port: Option<u16>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    server: ServerConfig,
    database: DatabaseConfig,
    auth: AuthConfig,
    media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DatabaseConfig {
    path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/campus-connect.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct MediaConfig {
    dir: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/media"),
        }
    }
}

/// Load configuration from file (optional) and environment.
///
/// Environment variables use the CAMPUS_CONNECT prefix, e.g.
/// CAMPUS_CONNECT__AUTH__JWT_SECRET.
fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        None => {
            builder = builder
                .add_source(File::new("campus-connect.toml", FileFormat::Toml).required(false));
        }
    }

    builder = builder.add_source(Environment::with_prefix("CAMPUS_CONNECT").separator("__"));

    builder
        .build()
        .context("loading configuration")?
        .try_deserialize()
        .context("parsing configuration")
}

fn init_logging(common: &CommonOpts) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "campus_connect={0},tower_http={0}",
            common.log_level
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .compact(),
        )
        .try_init()
        .ok();

    // Also init env_logger for compatibility with log crate users
    let level: LevelFilter = common.log_level.parse().unwrap_or(LevelFilter::Info);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.try_init().ok();

    Ok(())
}

async fn handle_serve(config: AppConfig, cmd: ServeCommand) -> Result<()> {
    info!("Starting campus-connect server...");

    config
        .auth
        .validate()
        .context("invalid auth configuration")?;

    let db = Database::new(&config.database.path).await?;
    info!("Database ready: {}", config.database.path.display());

    std::fs::create_dir_all(&config.media.dir)
        .with_context(|| format!("creating media directory: {}", config.media.dir.display()))?;
    let storage = Arc::new(LocalStorage::new(config.media.dir.clone()));

    let auth_state = AuthState::new(config.auth.clone());
    let state = AppState::new(&db, auth_state, storage, config.media.dir.clone());
    let app = api::create_router(state);

    let host = cmd.host.unwrap_or(config.server.host);
    let port = cmd.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parsing bind address")?;

    // Bind and serve
    let listener = TcpListener::bind(addr)
        .await
        .context("binding to address")?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
