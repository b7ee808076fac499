use async_trait::async_trait;
use sea_orm_migration::{prelude::*, schema::*};

use super::m20250529_000001_create_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ProfileView {
    Table,
    Id,
    ViewerId,
    ViewedId,
    Timestamp,
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProfileView::Table)
                    .if_not_exists()
                    .col(pk_uuid(ProfileView::Id))
                    .col(uuid(ProfileView::ViewerId))
                    .col(uuid(ProfileView::ViewedId))
                    .col(timestamp_with_time_zone(ProfileView::Timestamp))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_view_viewer")
                            .from(ProfileView::Table, ProfileView::ViewerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_view_viewed")
                            .from(ProfileView::Table, ProfileView::ViewedId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_profile_view_pair")
                    .table(ProfileView::Table)
                    .col(ProfileView::ViewerId)
                    .col(ProfileView::ViewedId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileView::Table).to_owned())
            .await
    }
}
