use async_trait::async_trait;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(super) enum Country {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(super) enum State {
    Table,
    Id,
    Name,
    CountryId,
}

#[derive(DeriveIden)]
pub(super) enum City {
    Table,
    Id,
    Name,
    StateId,
    CountryId,
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Country::Table)
                    .if_not_exists()
                    .col(pk_auto(Country::Id))
                    .col(string(Country::Name))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(State::Table)
                    .if_not_exists()
                    .col(pk_auto(State::Id))
                    .col(string(State::Name))
                    .col(integer(State::CountryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_state_country")
                            .from(State::Table, State::CountryId)
                            .to(Country::Table, Country::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(City::Table)
                    .if_not_exists()
                    .col(pk_auto(City::Id))
                    .col(string(City::Name))
                    .col(integer(City::StateId))
                    .col(integer(City::CountryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_city_state")
                            .from(City::Table, City::StateId)
                            .to(State::Table, State::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_city_country")
                            .from(City::Table, City::CountryId)
                            .to(Country::Table, Country::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(City::Table)
                    .table(State::Table)
                    .table(Country::Table)
                    .to_owned(),
            )
            .await
    }
}
