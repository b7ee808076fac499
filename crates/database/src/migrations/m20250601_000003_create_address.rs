use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use sea_orm_migration::{prelude::*, schema::*};

use super::m20250529_000001_create_user::User;
use super::m20250601_000001_create_geo::{City, Country, State};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(super) enum Address {
    Table,
    Id,
    UserId,
    Address1,
    Address2,
    Address3,
    CityId,
    StateId,
    CountryId,
    Zipcode,
    Tag,
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(pk_uuid(Address::Id))
                    .col(uuid(Address::UserId))
                    .col(string(Address::Address1))
                    .col(string_null(Address::Address2))
                    .col(string_null(Address::Address3))
                    .col(integer(Address::CityId))
                    .col(integer(Address::StateId))
                    .col(integer(Address::CountryId))
                    .col(string(Address::Zipcode))
                    .col(string_len(Address::Tag, 50))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_user")
                            .from(Address::Table, Address::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_city")
                            .from(Address::Table, Address::CityId)
                            .to(City::Table, City::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_state")
                            .from(Address::Table, Address::StateId)
                            .to(State::Table, State::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_country")
                            .from(Address::Table, Address::CountryId)
                            .to(Country::Table, Country::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_address_user_tag")
                    .table(Address::Table)
                    .col(Address::UserId)
                    .col(Address::Tag)
                    .to_owned(),
            )
            .await?;

        // one address per personal tag; relatives' addresses share the family_member tag
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_address_user_personal_tag \
                 ON address (user_id, tag) WHERE tag <> 'family_member'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Address::Table).to_owned())
            .await
    }
}
