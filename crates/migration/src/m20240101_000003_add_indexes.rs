use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Property: index on owner for find-by-owner lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_property_user")
                    .table(Property::Table)
                    .col(Property::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_property_user").table(Property::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Property { Table, UserId }
