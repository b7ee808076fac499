mod app_config;
mod errors;
#[cfg(feature = "metrics")]
mod metrics;
mod middleware;
mod router;
mod services;
mod state;
mod storage;

use std::sync::Arc;

use jodidar_database::{DatabaseConnection, create_database};

use middleware::create_correlation_id;
use tokio::signal;
use tower_http::{
    compression::{CompressionLayer, DefaultPredicate, Predicate, predicate::SizeAbove},
    trace::TraceLayer,
};

pub use app_config::*;
pub use errors::*;
pub use state::*;
pub use storage::LocalBlobStore;

// Lets in-flight requests finish on ctrl-c or SIGTERM, which is what
// container runtimes send before restarting a container
async fn shutdown_signal(message: impl AsRef<str>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("{}", message.as_ref());
}

/// Wraps the api routes with request spans and response compression.
fn build_app(state: ApiState) -> axum::Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                correlation_id = %create_correlation_id(request)
            )
        });

    // bodies under 1 KiB are sent as is
    let compression_layer =
        CompressionLayer::new().compress_when(DefaultPredicate::new().and(SizeAbove::new(1024)));

    router::create_router()
        .with_state(state)
        .layer(trace_layer)
        .layer(compression_layer)
}

pub async fn start(app_config: AppConfig) -> anyhow::Result<()> {
    let AppConfig {
        api,
        database,
        storage,
        #[cfg(feature = "metrics")]
        metrics,
        ..
    } = app_config;

    let db = create_database(DatabaseConnection::Postgres(database)).await?;
    tracing::info!("connected to database");

    let state = ApiState {
        db: Arc::new(db),
        blobs: Arc::new(LocalBlobStore::new(&storage)),
    };
    tracing::info!(bucket = %storage.bucket, dir = %storage.local_dir, "image storage ready");

    let api_addr = format!("{}:{}", api.url, api.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    tracing::info!("started http server at {}", api_addr);

    #[cfg(feature = "metrics")]
    metrics::serve_metrics_server(metrics);

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal("Shutting down API server"))
        .await?;

    Ok(())
}
