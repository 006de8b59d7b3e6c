//! All Time Music (atm-site) - Main entry point
//!
//! Serves the catalog site and its JSON API, or creates an administrator
//! account with `atm-site create-admin`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use atm_common::config::{resolve_root_folder, TomlConfig};
use atm_common::validators::{is_valid_email, validate_password};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tokio::signal;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use atm_site::db::{sessions, users};
use atm_site::{build_router, AppState};

/// Command-line arguments for atm-site
#[derive(Parser, Debug)]
#[command(name = "atm-site")]
#[command(about = "All Time Music catalog site")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "ATM_PORT")]
    port: Option<u16>,

    /// Address to bind to (overrides the config file)
    #[arg(short, long, env = "ATM_BIND")]
    bind: Option<String>,

    /// Root folder holding the database
    #[arg(short, long, env = "ATM_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "ATM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Create an administrator account
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

/// `EnvFilter` directives for a configured level
///
/// A bare level applies to this service, atm-common and tower-http; anything
/// with `=` or `,` is taken as a full directive string.
fn log_directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("atm_site={0},atm_common={0},tower_http={0}", level)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before the real subscriber exists, its messages go to a
    // bootstrap subscriber
    let bootstrap = tracing_subscriber::fmt().with_max_level(Level::INFO).finish();
    let config = tracing::subscriber::with_default(bootstrap, || {
        TomlConfig::load_or_default(args.config.as_deref())
    });

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directives(&config.logging.level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "All Time Music (atm-site) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    info!("Root folder: {}", root_folder.display());

    let db_path = config.database_path(&root_folder);
    let pool = atm_common::db::init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let port = args.port.unwrap_or(config.port);
            let bind = args.bind.unwrap_or_else(|| config.bind_address.clone());
            serve(pool, &bind, port, config.session_ttl_hours).await
        }
        Command::CreateAdmin {
            username,
            email,
            password,
        } => create_admin(&pool, &username, &email, &password).await,
    }
}

/// Socket address for a bind IP (v4 or v6, optionally bracketed) and port
fn listen_addr(bind: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = bind
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .with_context(|| format!("Invalid bind address {}", bind))?;
    Ok(SocketAddr::new(ip, port))
}

async fn serve(pool: SqlitePool, bind: &str, port: u16, session_ttl_hours: i64) -> Result<()> {
    let expired = sessions::delete_expired(&pool)
        .await
        .context("Failed to purge expired sessions")?;
    if expired > 0 {
        info!("Removed {} expired sessions", expired);
    }

    let app = build_router(AppState::new(pool, session_ttl_hours));

    let addr = listen_addr(bind, port)?;

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn create_admin(pool: &SqlitePool, username: &str, email: &str, password: &str) -> Result<()> {
    if let Err(e) = validate_password(password) {
        bail!("{}", e);
    }
    if !is_valid_email(email) {
        bail!("Enter a valid email address.");
    }
    if users::username_exists(pool, username).await? {
        bail!("User {} already exists", username);
    }

    let id = users::create_user(
        pool,
        &users::NewUser {
            username,
            email,
            first_name: "",
            last_name: "",
            password,
            is_admin: true,
        },
    )
    .await
    .context("Failed to create administrator")?;

    info!("Administrator {} created with id {}", username, id);
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives() {
        assert_eq!(
            log_directives("debug"),
            "atm_site=debug,atm_common=debug,tower_http=debug"
        );
        assert_eq!(log_directives("atm_site=trace"), "atm_site=trace");
    }

    #[test]
    fn test_listen_addr_accepts_ipv4_and_ipv6() {
        assert_eq!(listen_addr("127.0.0.1", 8000).unwrap().to_string(), "127.0.0.1:8000");
        assert_eq!(listen_addr("::1", 8000).unwrap().to_string(), "[::1]:8000");
        assert_eq!(listen_addr("[::]", 9000).unwrap().to_string(), "[::]:9000");
        assert!(listen_addr("localhost", 8000).is_err());
    }

    #[test]
    fn test_args_default_to_serve() {
        let args = Args::parse_from(["atm-site", "--port", "9000"]);
        assert_eq!(args.port, Some(9000));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_create_admin_args() {
        let args = Args::parse_from([
            "atm-site",
            "create-admin",
            "--username",
            "root",
            "--email",
            "root@example.com",
            "--password",
            "goodpass1!",
        ]);
        assert!(matches!(args.command, Some(Command::CreateAdmin { .. })));
    }
}
