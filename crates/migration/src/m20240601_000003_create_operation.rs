use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Operation::Table)
                    .if_not_exists()
                    .col(uuid(Operation::Id).primary_key())
                    .col(string_len(Operation::Name, 100).not_null())
                    .col(string_len_null(Operation::Description, 500))
                    .col(string_len(Operation::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Operation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Operation::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Operation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Operation { Table, Id, Name, Description, Status, CreatedAt, UpdatedAt }
