use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use pollflow_core::assistant::{Assistant, AssistantDelays, SimulatedAssistant};
use pollflow_core::backend::PollBackend;
use pollflow_core::local::LocalBackend;
use pollflow_upstream::{RemoteAssistant, RemoteBackend, UpstreamClient};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use config::BackendMode;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = cli::Args::parse();
    let config = config::Config::load(&args.config)?;

    ensure_data_dirs(&config);

    let delays = AssistantDelays {
        respond: Duration::from_millis(config.assistant.respond_delay_ms),
        summarize: Duration::from_millis(config.assistant.summary_delay_ms),
        analyze: Duration::from_millis(config.assistant.analysis_delay_ms),
    };

    // The backend facade is resolved exactly once, here; handlers only ever
    // see the trait objects.
    let (backend, assistant): (Arc<dyn PollBackend>, Arc<dyn Assistant>) =
        match config.backend.mode {
            BackendMode::Local => {
                let db = pollflow_db::create_pool(
                    &config.database.url,
                    config.database.max_connections,
                )
                .await?;
                pollflow_db::run_migrations(&db).await?;
                tracing::info!("backend: local sqlite at {}", config.database.url);
                let assistant: Arc<dyn Assistant> =
                    Arc::new(SimulatedAssistant::new(delays));
                (Arc::new(LocalBackend::new(db, assistant.clone())), assistant)
            }
            BackendMode::Remote => {
                let client = UpstreamClient::new(&config.backend.base_url)?;
                tracing::info!("backend: remote upstream at {}", config.backend.base_url);
                (
                    Arc::new(RemoteBackend::new(client.clone())),
                    Arc::new(RemoteAssistant::new(client)),
                )
            }
        };

    let state = pollflow_core::AppState { backend, assistant };
    let router = pollflow_api::build_router().with_state(state);

    // CLI --web-dir overrides the config file.
    let web_dir: Option<PathBuf> = args
        .web_dir
        .or(config.server.web_dir.clone())
        .map(PathBuf::from)
        .filter(|p| {
            if p.is_dir() {
                true
            } else {
                tracing::warn!("web UI directory {:?} does not exist, skipping static file serving", p);
                false
            }
        });

    // Unknown paths fall back to index.html so the client router can own
    // home, poll-creation, poll view, and not-found.
    let app = if let Some(ref dir) = web_dir {
        let spa_fallback = tower_http::services::ServeFile::new(dir.join("index.html"));
        let serve_dir =
            tower_http::services::ServeDir::new(dir).not_found_service(spa_fallback);
        tracing::info!("web ui: serving from {:?}", dir);
        router.fallback_service(serve_dir)
    } else {
        tracing::info!("web ui: none (API-only mode)");
        router
    };

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!("listening on {}", config.server.bind_address);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

/// Create the database's parent directory before sqlx tries to open it.
fn ensure_data_dirs(config: &config::Config) {
    if let Some(db_path) = config
        .database
        .url
        .strip_prefix("sqlite://")
        .and_then(|s| s.split('?').next())
    {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
    }
}
