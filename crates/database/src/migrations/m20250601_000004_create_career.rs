use async_trait::async_trait;
use sea_orm_migration::{prelude::*, schema::*};

use super::m20250529_000001_create_user::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Education {
    Table,
    Id,
    UserId,
    Degree,
    Specialization,
    University,
    Institution,
    YearOfPassing,
    Grade,
}

#[derive(DeriveIden)]
enum ProfessionalDetails {
    Table,
    Id,
    UserId,
    Occupation,
    CompanyName,
    Designation,
    YearsOfExperience,
    Package,
    TurnOver,
    Location,
    EmploymentType,
}

#[derive(DeriveIden)]
enum PhoneAlternate {
    Table,
    Id,
    UserId,
    Phone,
}

#[derive(DeriveIden)]
enum Language {
    Table,
    Id,
    UserId,
    Name,
    Proficiency,
    Certification,
    Notes,
}

fn owned_by_user<T: IntoIden + 'static>(table: T, column: T, name: &str) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(User::Table, User::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Education::Table)
                    .if_not_exists()
                    .col(pk_uuid(Education::Id))
                    .col(uuid(Education::UserId))
                    .col(string_null(Education::Degree))
                    .col(string_null(Education::Specialization))
                    .col(string_null(Education::University))
                    .col(string_null(Education::Institution))
                    .col(integer_null(Education::YearOfPassing))
                    .col(string_null(Education::Grade))
                    .foreign_key(&mut owned_by_user(
                        Education::Table,
                        Education::UserId,
                        "fk_education_user",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfessionalDetails::Table)
                    .if_not_exists()
                    .col(pk_uuid(ProfessionalDetails::Id))
                    .col(uuid(ProfessionalDetails::UserId))
                    .col(string_null(ProfessionalDetails::Occupation))
                    .col(string_null(ProfessionalDetails::CompanyName))
                    .col(string_null(ProfessionalDetails::Designation))
                    .col(integer_null(ProfessionalDetails::YearsOfExperience))
                    .col(string_null(ProfessionalDetails::Package))
                    .col(string_null(ProfessionalDetails::TurnOver))
                    .col(string_null(ProfessionalDetails::Location))
                    .col(string_null(ProfessionalDetails::EmploymentType))
                    .foreign_key(&mut owned_by_user(
                        ProfessionalDetails::Table,
                        ProfessionalDetails::UserId,
                        "fk_professional_details_user",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PhoneAlternate::Table)
                    .if_not_exists()
                    .col(pk_uuid(PhoneAlternate::Id))
                    .col(uuid(PhoneAlternate::UserId))
                    .col(string(PhoneAlternate::Phone))
                    .foreign_key(&mut owned_by_user(
                        PhoneAlternate::Table,
                        PhoneAlternate::UserId,
                        "fk_phone_alternate_user",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Language::Table)
                    .if_not_exists()
                    .col(pk_uuid(Language::Id))
                    .col(uuid(Language::UserId))
                    .col(string(Language::Name))
                    .col(string_null(Language::Proficiency))
                    .col(string_null(Language::Certification))
                    .col(text_null(Language::Notes))
                    .foreign_key(&mut owned_by_user(
                        Language::Table,
                        Language::UserId,
                        "fk_language_user",
                    ))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Language::Table)
                    .table(PhoneAlternate::Table)
                    .table(ProfessionalDetails::Table)
                    .table(Education::Table)
                    .to_owned(),
            )
            .await
    }
}
