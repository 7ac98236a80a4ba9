use std::error::Error;
use std::net::SocketAddr;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{self, Cli, Command};
use crate::cfg;
use crate::core;

/// Application-level error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigLoadingFailed(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    DatabaseOperationFailed(#[from] core::DbError),

    #[error("Migration error: {0}")]
    MigrationFailed(#[from] app::MigrationError),

    #[error("CLI error: {0}")]
    CliOperationFailed(#[from] app::CliError),

    #[error("Network address parsing error: {0}")]
    AddressParsingFailed(#[from] std::net::AddrParseError),

    #[error("Server error: {0}")]
    ServerStartingFailed(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

pub async fn run() {
    if let Err(e) = run_app().await {
        eprintln!("❌ {e}\n");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("Caused by: {err}");
            source = err.source();
        }

        std::process::exit(1);
    }
}

async fn run_app() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = cfg::AppSettings::new()?;

    // logs go to stderr so CLI output on stdout stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&settings.server.log_directives))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let db = core::create_db_context(&settings.database).await?;
    let command = cli.command.unwrap_or(Command::Serve);
    let is_migrate = matches!(command, Command::Migrate { .. });
    if settings.database.run_migrations && !is_migrate {
        app::run_migrations(&db).await?;
    }

    let http_client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let context = core::Context::new(db, http_client, settings);

    if !matches!(command, Command::Serve) {
        app::run_cli(&context, command).await?;
        return Ok(());
    }

    let server_address = context.settings.get_server_address();
    let address = server_address.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("🚀 starting server");
    tracing::info!("   app_env: {}", cfg::AppSettings::get_app_run_env());
    tracing::info!("   cfg_dir: {}", cfg::AppSettings::get_config_full_path());
    tracing::info!("   logging: {}", context.settings.server.log_directives);
    tracing::info!("   address: http://{}", server_address);

    let router = app::create_router(context);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Tokio signal handler that will wait for a user to press CTRL+C.
/// We use this in our `Server` method `with_graceful_shutdown`.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, shutting down gracefully"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
