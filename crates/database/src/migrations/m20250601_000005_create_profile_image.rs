use async_trait::async_trait;
use sea_orm_migration::{prelude::*, schema::*};

use super::m20250529_000001_create_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ProfileImage {
    Table,
    Id,
    UserId,
    ImageUrl,
    IsPrimary,
    UploadedAt,
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileImage::Table)
                    .if_not_exists()
                    .col(pk_uuid(ProfileImage::Id))
                    .col(uuid(ProfileImage::UserId))
                    .col(string(ProfileImage::ImageUrl))
                    .col(boolean(ProfileImage::IsPrimary).default(false))
                    .col(timestamp_with_time_zone(ProfileImage::UploadedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_image_user")
                            .from(ProfileImage::Table, ProfileImage::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_image_user")
                    .table(ProfileImage::Table)
                    .col(ProfileImage::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileImage::Table).to_owned())
            .await
    }
}
