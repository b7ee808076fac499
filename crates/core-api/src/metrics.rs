use axum::Router;
use axum::routing::get;
use prometheus::IntCounterVec;
use prometheus::register_int_counter_vec;
use serde::Deserialize;
use std::sync::LazyLock;
use tower_http::trace::TraceLayer;

// Metrics get their own port so they can stay reachable from inside the
// network only, without touching the public listener.

#[derive(Deserialize)]
pub struct MetricsConfig {
    url: String,
    port: u16,
}

pub fn serve_metrics_server(config: MetricsConfig) {
    let addr = format!("{}:{}", config.url, config.port);

    tokio::task::spawn(async move {
        let listener = match tokio::net::TcpListener::bind(addr.clone()).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(error = %e, "unable to bind metrics server to {}", addr);
                return;
            }
        };

        let app = Router::new().route("/metrics", get(metrics)).layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    correlation_id = %create_correlation_id(request)
                )
            }),
        );

        tracing::info!("started metrics server on {}", addr);

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal("Shutting down metrics server"))
            .await
        {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });
}

async fn metrics() -> String {
    prometheus::TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .unwrap_or_default()
}

pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

pub enum Object {
    User,
    Profile,
    Address,
    Education,
    Professional,
    Language,
    Family,
    Image,
    Search,
    Geo,
}

pub static REQUEST_COUNT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "request_count",                           // label name
        "Number of requests by method and object", // description
        &["method", "object"]                      // sub-label names
    )
    // registered once at startup, a failure shows up immediately
    .unwrap()
});

#[allow(unused)]
macro_rules! inc {
    ($m:ident for [$( $l:expr ),*]) => {
        $m.with_label_values(&[$($l.into()),*]).inc();
    };
    ($m:ident for $l:expr) => {
        $m.with_label_values(&[$l.into()]).inc();
    };
}

#[allow(unused)]
pub(crate) use inc;

use crate::middleware::create_correlation_id;
use crate::shutdown_signal;

// label values have to be strings
impl From<Method> for &str {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Object> for &str {
    fn from(value: Object) -> Self {
        match value {
            Object::User => "user",
            Object::Profile => "profile",
            Object::Address => "address",
            Object::Education => "education",
            Object::Professional => "professional",
            Object::Language => "language",
            Object::Family => "family",
            Object::Image => "image",
            Object::Search => "search",
            Object::Geo => "geo",
        }
    }
}
