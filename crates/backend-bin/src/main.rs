use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use authgate_backend::{
    auth::{SessionManager, SessionStore},
    config::{Settings, DEFAULT_CONFIG_FILE},
    router,
    storage::{MemoryUserStore, PgUserStore, UserStore},
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Session-based username/password authentication server
#[derive(Debug, Parser)]
#[command(name = "authgate", version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the bind address from the config
    #[arg(long)]
    bind: Option<SocketAddr>,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn user_store(settings: &Settings) -> anyhow::Result<Arc<dyn UserStore>> {
    match &settings.database_url {
        Some(url) => {
            let store = PgUserStore::connect(url)
                .await
                .context("failed to connect to the user database")?;
            store.migrate().await.context("failed to apply users schema")?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("no database_url configured, users are kept in memory and lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("failed to load settings from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    let users = user_store(&settings).await?;

    let sessions = SessionManager::new(Duration::from_secs(settings.session.ttl_secs));
    let cleanup =
        sessions.spawn_cleanup(Duration::from_secs(settings.session.cleanup_interval_secs));
    let sessions: Arc<dyn SessionStore> = Arc::new(sessions);

    let addr = settings.bind_addr;
    let base_path = settings.base_path.clone();
    let state = Arc::new(
        AppState::new(users, sessions, settings).context("failed to build auth service")?,
    );
    let app = router::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, base_path = %base_path, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    Ok(())
}
