use jodidar_database::DatabaseConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use crate::metrics::MetricsConfig;

// Parsed from AppSettings.toml. New settings go into one of these structs
// or into a new struct added as a field, as long as it derives Deserialize
#[derive(Deserialize)]
pub struct AppConfig {
    pub rust_log: String,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub loki: Option<LokiConfig>,
    #[cfg(feature = "metrics")]
    pub metrics: MetricsConfig,
}

#[derive(Deserialize)]
pub struct ApiConfig {
    pub url: String,
    pub port: u16,
}

/// Where profile images go. `bucket` and `region` fix the public url of every
/// stored image, `local_dir` is where this server keeps the objects themselves.
#[derive(Deserialize, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub local_dir: String,
}

#[derive(Deserialize)]
pub struct LokiConfig {
    pub url: String,
    pub service_name: String,
}
