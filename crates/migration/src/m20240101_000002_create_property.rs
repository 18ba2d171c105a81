//! Create `property` table with FK to `users`.
//!
//! Deleting a user removes the listings it owns.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Property::Table)
                    .if_not_exists()
                    .col(pk_auto(Property::Id))
                    .col(string_len(Property::Address, 255).not_null())
                    .col(integer(Property::Price).not_null())
                    .col(integer(Property::Size).not_null())
                    .col(string_len(Property::Description, 500).not_null())
                    .col(string_len(Property::UserId, 64).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_user")
                            .from(Property::Table, Property::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Property::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Property {
    Table,
    Id,
    Address,
    Price,
    Size,
    Description,
    UserId,
}

#[derive(DeriveIden)]
enum Users { Table, Username }
