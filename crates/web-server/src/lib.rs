use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use configuration::Config;
use news::{run_news_poller, NewsService, NewsUpdate};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use crate::error::AppError;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub news: Arc<NewsService>,
    /// The last update published by the poller, if it has run yet.
    pub latest: RwLock<Option<NewsUpdate>>,
}

impl AppState {
    pub fn new(news: Arc<NewsService>) -> Self {
        Self {
            news,
            latest: RwLock::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(Arc::new(NewsService::from_config(&config.news)?)))
    }

    /// The poller's latest update, or a refresh on demand before its first run.
    pub async fn current_news(&self) -> NewsUpdate {
        if let Some(update) = self.latest.read().await.clone() {
            return update;
        }
        let update = self.news.refresh(Utc::now()).await;
        *self.latest.write().await = Some(update.clone());
        update
    }
}

/// Builds the application routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/calc/stock-average", post(handlers::stock_average))
        .route("/api/calc/target-average", post(handlers::target_average))
        .route("/api/calc/roi", post(handlers::roi))
        .route("/api/calc/roi-advanced", post(handlers::roi_advanced))
        .route("/api/calc/emi", post(handlers::emi))
        .route("/api/calc/percentage", post(handlers::percentage))
        .route("/api/calc/sip", post(handlers::sip))
        .route("/api/calc/lumpsum", post(handlers::lumpsum))
        .route("/api/calc/swp", post(handlers::swp))
        .route("/api/calc/cagr", post(handlers::cagr))
        .route("/api/calc/pivot", post(handlers::pivot))
        .route("/api/news", get(handlers::get_news))
        .route("/api/news/ticker", get(handlers::get_news_ticker))
        .route("/api/news/cards", get(handlers::get_news_cards))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Copies every poller update into the shared state until the channel closes.
async fn track_latest(state: Arc<AppState>, mut rx: broadcast::Receiver<NewsUpdate>) {
    loop {
        match rx.recv().await {
            Ok(update) => {
                tracing::debug!(items = update.items().len(), "News snapshot updated.");
                *state.latest.write().await = Some(update);
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("News tracker lagged, skipped {} updates.", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(addr: SocketAddr, config: &Config) -> anyhow::Result<()> {
    let app_state = Arc::new(AppState::from_config(config)?);

    let (news_tx, news_rx) = broadcast::channel(16);
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let poller = tokio::spawn(run_news_poller(
        app_state.news.clone(),
        news_tx,
        config.news.poll_interval,
        shutdown_rx,
    ));
    tokio::spawn(track_latest(app_state.clone(), news_rx));

    let app = router(app_state);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(());
    poller.await?;
    Ok(())
}
