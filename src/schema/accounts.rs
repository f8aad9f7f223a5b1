use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use sea_orm_migration::prelude::*;

pub async fn apply(
    manager: &SchemaManager<'_>,
    conn: &DatabaseConnection,
) -> Result<(), DbErr> {
    if !manager.has_table("accounts").await? {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Uid)
                            .uuid()
                            .not_null()
                            .default(SimpleExpr::Custom("gen_random_uuid()".into())),
                    )
                    .col(ColumnDef::new(Accounts::Email).string_len(255))
                    .col(ColumnDef::new(Accounts::MobileNumber).string_len(15))
                    .col(ColumnDef::new(Accounts::Username).string_len(255))
                    .col(
                        ColumnDef::new(Accounts::FirstName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Accounts::LastName)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Accounts::DateOfBirth).date())
                    .col(flag(Accounts::IsActive, true))
                    .col(flag(Accounts::IsStaff, false))
                    .col(flag(Accounts::IsVendor, false))
                    .col(flag(Accounts::IsSuperuser, false))
                    .col(ColumnDef::new(Accounts::Address).string_len(255))
                    .col(ColumnDef::new(Accounts::Gender).string_len(10))
                    .col(ColumnDef::new(Accounts::ProfilePicture).string_len(255))
                    .col(flag(Accounts::EmailVerified, false))
                    .col(flag(Accounts::PhoneVerified, false))
                    .col(
                        ColumnDef::new(Accounts::Location)
                            .string_len(255)
                            .not_null()
                            .default("Unknown"),
                    )
                    .col(flag(Accounts::IsRoutable, false))
                    .col(ColumnDef::new(Accounts::VerificationCode).string_len(64))
                    .col(
                        ColumnDef::new(Accounts::VerificationCodeExpiry)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(Accounts::Latitude).decimal_len(9, 6))
                    .col(ColumnDef::new(Accounts::Longitude).decimal_len(9, 6))
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Custom("now()".into())),
                    )
                    .to_owned(),
            )
            .await?;

        conn
            .execute(Statement::from_string(
                DbBackend::Postgres,
                "ALTER TABLE accounts ADD CONSTRAINT accounts_identity_check \
                 CHECK (email IS NOT NULL OR mobile_number IS NOT NULL)"
                    .to_string(),
            ))
            .await?;

        conn
            .execute(Statement::from_string(
                DbBackend::Postgres,
                "ALTER TABLE accounts ADD CONSTRAINT accounts_mobile_number_digits_check \
                 CHECK (mobile_number ~ '^[0-9]+$')"
                    .to_string(),
            ))
            .await?;

        conn
            .execute(Statement::from_string(
                DbBackend::Postgres,
                "ALTER TABLE accounts ADD CONSTRAINT accounts_gender_check \
                 CHECK (gender IN ('Male','Female','Other'))"
                    .to_string(),
            ))
            .await?;
    }

    for statement in [
        "CREATE UNIQUE INDEX IF NOT EXISTS accounts_uid_unique ON accounts (uid)",
        "CREATE UNIQUE INDEX IF NOT EXISTS accounts_email_unique \
         ON accounts (lower(email)) WHERE email IS NOT NULL",
        "CREATE UNIQUE INDEX IF NOT EXISTS accounts_mobile_number_unique \
         ON accounts (mobile_number) WHERE mobile_number IS NOT NULL",
    ] {
        conn
            .execute(Statement::from_string(DbBackend::Postgres, statement.to_string()))
            .await?;
    }

    Ok(())
}

fn flag(column: Accounts, default: bool) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(default)
        .to_owned()
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Uid,
    Email,
    MobileNumber,
    Username,
    FirstName,
    LastName,
    DateOfBirth,
    IsActive,
    IsStaff,
    IsVendor,
    IsSuperuser,
    Address,
    Gender,
    ProfilePicture,
    EmailVerified,
    PhoneVerified,
    Location,
    IsRoutable,
    VerificationCode,
    VerificationCodeExpiry,
    Latitude,
    Longitude,
    CreatedAt,
    UpdatedAt,
}
