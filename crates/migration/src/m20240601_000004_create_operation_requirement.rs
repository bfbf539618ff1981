//! Create `operation_requirement` join table.
//!
//! Rows are owned by their operation (cascade delete) and reference a
//! vehicle type (restrict delete). `position` keeps the caller's ordering.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OperationRequirement::Table)
                    .if_not_exists()
                    .col(uuid(OperationRequirement::Id).primary_key())
                    .col(uuid(OperationRequirement::OperationId).not_null())
                    .col(uuid(OperationRequirement::VehicleTypeId).not_null())
                    .col(integer(OperationRequirement::Quantity).not_null())
                    .col(integer(OperationRequirement::Position).not_null())
                    .col(timestamp_with_time_zone(OperationRequirement::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requirement_operation")
                            .from(OperationRequirement::Table, OperationRequirement::OperationId)
                            .to(Operation::Table, Operation::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requirement_vehicle_type")
                            .from(OperationRequirement::Table, OperationRequirement::VehicleTypeId)
                            .to(VehicleType::Table, VehicleType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OperationRequirement::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OperationRequirement { Table, Id, OperationId, VehicleTypeId, Quantity, Position, CreatedAt }

#[derive(DeriveIden)]
enum Operation { Table, Id }

#[derive(DeriveIden)]
enum VehicleType { Table, Id }
