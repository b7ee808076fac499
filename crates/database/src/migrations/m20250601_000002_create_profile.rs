use async_trait::async_trait;
use sea_orm_migration::{prelude::*, schema::*};

use super::m20250529_000001_create_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Profile {
    Table,
    Id,
    UserId,
    Gender,
    LookingFor,
    DateOfBirth,
    LegacyDateOfBirth,
    BirthTime,
    BirthVillage,
    BirthCity,
    BirthState,
    BirthCountry,
    Height,
    Bio,
    ProfilePicture,
    LinkedinUrl,
    NoBrother,
    NoSister,
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(pk_uuid(Profile::Id))
                    .col(uuid(Profile::UserId).unique_key())
                    .col(string_null(Profile::Gender))
                    .col(string_null(Profile::LookingFor))
                    .col(date_null(Profile::DateOfBirth))
                    .col(string_null(Profile::LegacyDateOfBirth))
                    .col(string_null(Profile::BirthTime))
                    .col(string_null(Profile::BirthVillage))
                    .col(string_null(Profile::BirthCity))
                    .col(string_null(Profile::BirthState))
                    .col(string_null(Profile::BirthCountry))
                    .col(integer_null(Profile::Height))
                    .col(text_null(Profile::Bio))
                    .col(string_null(Profile::ProfilePicture))
                    .col(string_null(Profile::LinkedinUrl))
                    .col(boolean(Profile::NoBrother).default(false))
                    .col(boolean(Profile::NoSister).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_user")
                            .from(Profile::Table, Profile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}
