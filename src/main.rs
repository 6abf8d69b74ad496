//! Umpire Back binary entrypoint wiring REST, SSE, and result storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use umpire_back::{
    config::AppConfig,
    dao::result_store::memory::InMemoryResultStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    install_result_store(&app_state).await;
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Use CouchDB when `COUCH_BASE_URL` is set, the in-memory store otherwise.
#[cfg(feature = "couch-store")]
async fn install_result_store(state: &SharedState) {
    use umpire_back::{
        dao::{
            result_store::{
                ResultStore,
                couchdb::{CouchConfig, CouchResultStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    match CouchConfig::from_env() {
        Ok(couch) => {
            info!(base_url = %couch.base_url, database = %couch.database, "using CouchDB result store");
            tokio::spawn(storage_supervisor::run(state.clone(), move || {
                let couch = couch.clone();
                async move {
                    let store = CouchResultStore::connect(couch).await?;
                    Ok::<_, StorageError>(Arc::new(store) as Arc<dyn ResultStore>)
                }
            }));
        }
        Err(err) => {
            info!(reason = %err, "CouchDB not configured; keeping results in memory");
            state
                .set_result_store(Arc::new(InMemoryResultStore::new()))
                .await;
        }
    }
}

#[cfg(not(feature = "couch-store"))]
async fn install_result_store(state: &SharedState) {
    info!("keeping results in memory");
    state
        .set_result_store(Arc::new(InMemoryResultStore::new()))
        .await;
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
