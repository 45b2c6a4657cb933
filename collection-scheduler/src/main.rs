use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use collection_scheduler::clock::SystemClock;
use collection_scheduler::config::SchedulerConfig;
use collection_scheduler::store::{InMemoryStore, Seed};
use collection_scheduler::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match SchedulerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match &config.seed_path {
        Some(path) => match Seed::load(path) {
            Ok(seed) => InMemoryStore::from_seed(seed),
            Err(e) => {
                error!(error = %e, "failed to load seed data");
                return ExitCode::FAILURE;
            }
        },
        None => {
            warn!("no seed file configured, starting with an empty store");
            InMemoryStore::new()
        }
    };
    info!(
        vehicles = store.vehicle_count(),
        employees = store.employee_count(),
        "store ready"
    );

    let addr = config.bind_addr;
    let interval = config.advance_interval();
    let state = AppState::new(store, config, SystemClock);

    // Periodic batch advance; the first tick fires immediately
    let batch = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = batch.advance_due_schedules().await {
                error!(error = %e, "batch advance failed");
            }
        }
    });

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(%addr, "collection scheduler listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
