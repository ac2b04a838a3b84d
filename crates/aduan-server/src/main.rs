//! Aduan server entry point.

use aduan_db::{DbConfig, DbManager};
use aduan_notify::{LogMailer, NotificationDispatcher};
use aduan_server::{AppState, Args, ServerConfig, router};
use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log).unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = ServerConfig::load(&args)?;
    info!(bind = %config.bind, "Starting Aduan server");

    let auth_config = config.auth.load()?;
    let db_config: DbConfig = config.database.clone().into();
    let db = DbManager::connect(&db_config)
        .await
        .context("connecting to SurrealDB")?;

    let mailer = LogMailer::new(config.notify.from_address.clone());
    let (dispatcher, worker) = NotificationDispatcher::spawn(config.notify.clone(), mailer);

    let state = AppState::new(
        db.client().clone(),
        auth_config,
        config.policy.clone().into(),
        dispatcher,
    );

    if let Some(admin) = config.admin.clone() {
        let admin_id = state
            .auth
            .ensure_admin(admin)
            .await
            .context("creating bootstrap administrator")?;
        info!(user_id = %admin_id, "Bootstrap administrator ready");
    }

    let app = router(state, &config.cors.allowed_origins);
    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %config.bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    // The router held the last dispatcher handles; the worker drains and exits.
    if let Err(e) = worker.await {
        error!(error = %e, "Notification worker failed");
    }

    info!("Aduan server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
