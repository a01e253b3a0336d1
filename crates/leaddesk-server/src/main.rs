//! `LeadDesk` server entry point.
//!
//! Connects the lead store, prepares the upload directory and the mail
//! transport, then starts the Axum HTTP server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use leaddesk_core::notify::{NoopNotifier, Notifier, SmtpNotifier};
use leaddesk_core::service::LeadService;
use leaddesk_core::uploads::UploadStore;
use leaddesk_storage::{LeadStore, MemoryStore};

use leaddesk_server::app::build_router;
use leaddesk_server::config::{ServerConfig, StorageBackendType};
use leaddesk_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        storage = backend_label(&config.storage_backend),
        upload_dir = %config.upload_dir.display(),
        "LeadDesk starting"
    );

    let state = build_app_state(&config).await?;
    let app = build_router(state, &config.http, &config.upload_dir);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "LeadDesk server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("LeadDesk server stopped");
    Ok(())
}

async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let store = open_store(&config.storage_backend).await?;

    // An unreachable database at boot is not fatal; `/api/health` reports it
    // and the driver reconnects on the next operation.
    if let Err(e) = store.ping().await {
        warn!(error = %e, "lead store is not reachable yet");
    }

    let uploads = UploadStore::new(&config.upload_dir);
    uploads
        .ensure_dir()
        .await
        .context("failed to prepare upload directory")?;

    let notifier: Arc<dyn Notifier> = if let Some(mail) = &config.mail {
        let smtp = SmtpNotifier::new(mail.clone()).context("invalid mail configuration")?;
        info!(relay = %mail.relay_host, "email notifications enabled");
        Arc::new(smtp)
    } else {
        warn!("EMAIL_USER, EMAIL_PASS or ADMIN_EMAIL not set; email notifications disabled");
        Arc::new(NoopNotifier)
    };

    if config.admin_key.is_none() {
        warn!("ADMIN_API_KEY not set; admin routes will answer 500");
    }

    Ok(Arc::new(AppState {
        leads: LeadService::new(store, uploads, notifier),
        admin_key: config.admin_key.clone(),
        public_base_url: config.public_base_url.clone(),
    }))
}

async fn open_store(backend: &StorageBackendType) -> anyhow::Result<Arc<dyn LeadStore>> {
    let store: Arc<dyn LeadStore> = match backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            Arc::new(MemoryStore::new())
        }
        #[cfg(feature = "mongo-backend")]
        StorageBackendType::Mongo { uri, database } => {
            info!(uri = %"[redacted]", database = %database, "using MongoDB storage");
            Arc::new(
                leaddesk_storage::MongoStore::connect(uri, database)
                    .await
                    .context("failed to configure MongoDB client")?,
            )
        }
        #[cfg(not(feature = "mongo-backend"))]
        StorageBackendType::Mongo { .. } => {
            anyhow::bail!("MongoDB backend requested but feature 'mongo-backend' is not enabled");
        }
    };
    Ok(store)
}

fn backend_label(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Memory => "memory",
        StorageBackendType::Mongo { .. } => "mongo",
    }
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
