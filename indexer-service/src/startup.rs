use crate::config::{AddokConfig, IndexerConfig};
use crate::handlers;
use crate::workers::{CommandExecutor, CommandRunner, IndexPipeline};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, RequestId};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: IndexPipeline,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        addok: AddokConfig,
        runner: Arc<dyn CommandRunner>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            pipeline: IndexPipeline::new(runner, addok),
            metrics,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/upload", post(handlers::upload))
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(RequestId::as_str)
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the real `addok` executable.
    pub async fn build(
        config: IndexerConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        Self::build_with_runner(config, Arc::new(CommandExecutor::new()), metrics).await
    }

    pub async fn build_with_runner(
        config: IndexerConfig,
        runner: Arc<dyn CommandRunner>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            addok_bin = %config.addok.bin,
            batch_file = %config.addok.batch_file,
            settle_delay_secs = config.addok.settle_delay_secs,
            "Indexer service listening"
        );

        let router = build_router(AppState::new(config.addok, runner, metrics));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM, then drain in-flight requests.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
