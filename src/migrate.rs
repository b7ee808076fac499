use jodidar_core_api::AppConfig;
use jodidar_database::{DatabaseConnection, MigratorTrait, create_database};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config: AppConfig =
        toml::from_str(tokio::fs::read_to_string("AppSettings.toml").await?.as_str())?;

    let subscriber = Registry::default()
        .with(EnvFilter::from(app_config.rust_log.clone()))
        .with(fmt::layer().with_level(true));
    tracing::subscriber::set_global_default(subscriber)?;

    let db = create_database(DatabaseConnection::Postgres(app_config.database)).await?;

    jodidar_database::Migrator::up(&db.conn, None).await?;
    tracing::info!("schema is up to date");

    let converted = db.backfill_legacy_birth_dates().await?;
    tracing::info!(converted, "backfilled legacy birth dates");

    Ok(())
}
