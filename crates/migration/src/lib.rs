//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_vehicle_type;
mod m20240601_000002_create_vehicle;
mod m20240601_000003_create_operation;
mod m20240601_000004_create_operation_requirement;
mod m20240601_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_vehicle_type::Migration),
            Box::new(m20240601_000002_create_vehicle::Migration),
            Box::new(m20240601_000003_create_operation::Migration),
            Box::new(m20240601_000004_create_operation_requirement::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000005_add_indexes::Migration),
        ]
    }
}
