use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use sea_orm_migration::{prelude::*, schema::*};

use super::m20250529_000001_create_user::User;
use super::m20250601_000003_create_address::Address;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum RelationCategory {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum RelationType {
    Table,
    Id,
    CategoryId,
    Name,
}

#[derive(DeriveIden)]
enum FamilyDetails {
    Table,
    Id,
    UserId,
    FirstName,
    LastName,
    Occupation,
    ContactNumber,
    Age,
    Email,
    MaritalStatus,
    AddressId,
    IsSelf,
}

#[derive(DeriveIden)]
enum FamilyRelation {
    Table,
    Id,
    PersonId,
    RelatedPersonId,
    RelationType,
}

/// Reference taxonomy: category, description, relation types.
const TAXONOMY: [(&str, &str, &[&str]); 4] = [
    ("Parents", "Mother and father", &["Father", "Mother"]),
    ("Siblings", "Brothers and sisters", &["Brother", "Sister"]),
    ("Grandparents", "Parents of either parent", &["Grandfather", "Grandmother"]),
    (
        "Extended Family",
        "Relatives beyond the immediate family",
        &["Uncle", "Aunt", "Cousin"],
    ),
];

fn query_error(e: sea_orm::sea_query::error::Error) -> DbErr {
    DbErr::Migration(e.to_string())
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RelationCategory::Table)
                    .if_not_exists()
                    .col(pk_auto(RelationCategory::Id))
                    .col(string(RelationCategory::Name).unique_key())
                    .col(string_null(RelationCategory::Description))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RelationType::Table)
                    .if_not_exists()
                    .col(pk_auto(RelationType::Id))
                    .col(integer(RelationType::CategoryId))
                    .col(string(RelationType::Name).unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relation_type_category")
                            .from(RelationType::Table, RelationType::CategoryId)
                            .to(RelationCategory::Table, RelationCategory::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FamilyDetails::Table)
                    .if_not_exists()
                    .col(pk_uuid(FamilyDetails::Id))
                    .col(uuid(FamilyDetails::UserId))
                    .col(string(FamilyDetails::FirstName))
                    .col(string(FamilyDetails::LastName))
                    .col(string_null(FamilyDetails::Occupation))
                    .col(string_null(FamilyDetails::ContactNumber))
                    .col(integer_null(FamilyDetails::Age))
                    .col(string_null(FamilyDetails::Email))
                    .col(string_null(FamilyDetails::MaritalStatus))
                    .col(uuid_null(FamilyDetails::AddressId))
                    .col(boolean(FamilyDetails::IsSelf).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_family_details_user")
                            .from(FamilyDetails::Table, FamilyDetails::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_family_details_address")
                            .from(FamilyDetails::Table, FamilyDetails::AddressId)
                            .to(Address::Table, Address::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FamilyRelation::Table)
                    .if_not_exists()
                    .col(pk_uuid(FamilyRelation::Id))
                    .col(uuid(FamilyRelation::PersonId))
                    .col(uuid(FamilyRelation::RelatedPersonId))
                    .col(string(FamilyRelation::RelationType))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_family_relation_person")
                            .from(FamilyRelation::Table, FamilyRelation::PersonId)
                            .to(FamilyDetails::Table, FamilyDetails::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_family_relation_related_person")
                            .from(FamilyRelation::Table, FamilyRelation::RelatedPersonId)
                            .to(FamilyDetails::Table, FamilyDetails::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_family_relation_unique_edge")
                    .table(FamilyRelation::Table)
                    .col(FamilyRelation::PersonId)
                    .col(FamilyRelation::RelatedPersonId)
                    .col(FamilyRelation::RelationType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        let backend = manager.get_database_backend();
        for (category_id, (category, description, types)) in (1i32..).zip(TAXONOMY) {
            let insert = Query::insert()
                .into_table(RelationCategory::Table)
                .columns([
                    RelationCategory::Id,
                    RelationCategory::Name,
                    RelationCategory::Description,
                ])
                .values([category_id.into(), category.into(), description.into()])
                .map_err(query_error)?
                .to_owned();
            db.execute(backend.build(&insert)).await?;

            let mut insert = Query::insert();
            insert
                .into_table(RelationType::Table)
                .columns([RelationType::CategoryId, RelationType::Name]);
            for name in types {
                insert
                    .values([category_id.into(), (*name).into()])
                    .map_err(query_error)?;
            }
            db.execute(backend.build(&insert)).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(FamilyRelation::Table)
                    .table(FamilyDetails::Table)
                    .table(RelationType::Table)
                    .table(RelationCategory::Table)
                    .to_owned(),
            )
            .await
    }
}
