//! Create `vehicle` table with FK to `vehicle_type`.
//!
//! A vehicle type cannot be deleted while vehicles still reference it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicle::Table)
                    .if_not_exists()
                    .col(uuid(Vehicle::Id).primary_key())
                    .col(string_len(Vehicle::RegistrationNo, 20).unique_key().not_null())
                    .col(uuid(Vehicle::VehicleTypeId).not_null())
                    .col(string_len(Vehicle::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Vehicle::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Vehicle::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_vehicle_type")
                            .from(Vehicle::Table, Vehicle::VehicleTypeId)
                            .to(VehicleType::Table, VehicleType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Vehicle::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Vehicle { Table, Id, RegistrationNo, VehicleTypeId, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum VehicleType { Table, Id }
