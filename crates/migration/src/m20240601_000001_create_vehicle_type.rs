//! Create `vehicle_type` table.
//!
//! Names are unique; description and capacity are optional.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VehicleType::Table)
                    .if_not_exists()
                    .col(uuid(VehicleType::Id).primary_key())
                    .col(string_len(VehicleType::Name, 100).unique_key().not_null())
                    .col(string_len_null(VehicleType::Description, 500))
                    .col(integer_null(VehicleType::Capacity))
                    .col(timestamp_with_time_zone(VehicleType::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(VehicleType::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VehicleType::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum VehicleType { Table, Id, Name, Description, Capacity, CreatedAt, UpdatedAt }
