use serde::Deserialize;
use zeroize::ZeroizeOnDrop;

use crate::DatabaseError;

pub enum DatabaseConnection {
    Postgres(DatabaseConfig),
    #[cfg(test)]
    Sqlite(String),
}

#[derive(Deserialize, ZeroizeOnDrop, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(default = "default_database_name")]
    pub name: String,
}

fn default_database_name() -> String {
    "jodidar".to_string()
}

impl DatabaseConfig {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.url, self.port, self.name
        )
    }
}

#[derive(Debug)]
pub struct Database {
    pub conn: sea_orm::DatabaseConnection,
}

impl Database {
    pub async fn new(conn: DatabaseConnection) -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: match conn {
                DatabaseConnection::Postgres(config) => {
                    sea_orm::Database::connect(config.connection_string())
                        .await
                        .map_err(|_| DatabaseError::ConnectionError)?
                }
                // a single connection keeps every query on the same in-memory database
                #[cfg(test)]
                DatabaseConnection::Sqlite(s) => {
                    let mut options = sea_orm::ConnectOptions::new(s);
                    options.max_connections(1).sqlx_logging(false);

                    sea_orm::Database::connect(options)
                        .await
                        .map_err(|_| DatabaseError::ConnectionError)?
                }
            },
        })
    }
}

pub async fn create_database(conn: DatabaseConnection) -> Result<Database, DatabaseError> {
    Database::new(conn).await
}

#[cfg(test)]
pub async fn setup_test_db() -> Result<Database, Box<dyn std::error::Error>> {
    use sea_orm_migration::MigratorTrait;

    let db = Database::new(DatabaseConnection::Sqlite(
        std::env::var("DATABASE_URL").unwrap_or("sqlite::memory:".to_string()),
    ))
    .await?;

    crate::Migrator::up(&db.conn, None).await?;

    Ok(db)
}
