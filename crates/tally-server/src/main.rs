//! Tally server binary — HTTP CRUD backend for clients, projects, and
//! payments.
//!
//! Starts an axum HTTP server with structured logging, database pool setup,
//! idempotent schema provisioning, and graceful shutdown on SIGTERM/SIGINT.

use std::net::SocketAddr;
use tally_server::{app, config, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("TALLY_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the server cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    // Resolve the database location and build the pool
    let db_path = config::resolve_database_path(&config)
        .expect("no database location — set TALLY_DATABASE_URL, DATABASE_URL, or STORAGE_URL");

    let pool = tally_db::create_pool(
        &db_path,
        tally_db::PoolSettings {
            busy_timeout_ms: config.database.busy_timeout_ms,
            max_size: config.database.pool_max_size,
        },
    )
    .expect("failed to create database pool — check the database location");

    // Provision the schema. Not fatal: if the store is briefly unreachable
    // the tables usually exist already, and /health should keep answering
    // either way.
    match pool.get() {
        Ok(conn) => {
            if let Err(e) = tally_db::init_schema(&conn) {
                tracing::error!(error = %e, "schema provisioning failed, continuing startup");
            } else {
                tracing::info!("database schema provisioned");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "could not get a connection for schema provisioning");
        }
    }

    // Build application
    let app = app(AppState { pool });
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, "starting tally server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address — is another process using this port?");

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("tally server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
