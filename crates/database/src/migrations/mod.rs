mod m20250529_000001_create_user;
mod m20250601_000001_create_geo;
mod m20250601_000002_create_profile;
mod m20250601_000003_create_address;
mod m20250601_000004_create_career;
mod m20250601_000005_create_profile_image;
mod m20250601_000006_create_family;
mod m20250601_000007_create_profile_view;

use async_trait::async_trait;
pub use sea_orm_migration::*;

pub struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250529_000001_create_user::Migration),
            Box::new(m20250601_000001_create_geo::Migration),
            Box::new(m20250601_000002_create_profile::Migration),
            Box::new(m20250601_000003_create_address::Migration),
            Box::new(m20250601_000004_create_career::Migration),
            Box::new(m20250601_000005_create_profile_image::Migration),
            Box::new(m20250601_000006_create_family::Migration),
            Box::new(m20250601_000007_create_profile_view::Migration),
        ]
    }
}
