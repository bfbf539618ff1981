use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Vehicle: lookups by type
        manager
            .create_index(
                Index::create()
                    .name("idx_vehicle_vehicle_type")
                    .table(Vehicle::Table)
                    .col(Vehicle::VehicleTypeId)
                    .to_owned(),
            )
            .await?;

        // Requirement: at most one row per (operation, vehicle type)
        manager
            .create_index(
                Index::create()
                    .name("uniq_requirement_operation_vehicle_type")
                    .table(OperationRequirement::Table)
                    .col(OperationRequirement::OperationId)
                    .col(OperationRequirement::VehicleTypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirement_vehicle_type")
                    .table(OperationRequirement::Table)
                    .col(OperationRequirement::VehicleTypeId)
                    .to_owned(),
            )
            .await?;

        // Operation: default listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_operation_created_at")
                    .table(Operation::Table)
                    .col(Operation::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_vehicle_vehicle_type").table(Vehicle::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_requirement_operation_vehicle_type").table(OperationRequirement::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_requirement_vehicle_type").table(OperationRequirement::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_operation_created_at").table(Operation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Vehicle { Table, VehicleTypeId }

#[derive(DeriveIden)]
enum OperationRequirement { Table, OperationId, VehicleTypeId }

#[derive(DeriveIden)]
enum Operation { Table, CreatedAt }
