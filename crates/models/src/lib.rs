//! SeaORM entities for the fleet-operations schema.

pub mod errors;
pub mod db;
pub mod status;
pub mod vehicle_type;
pub mod vehicle;
pub mod operation;
pub mod operation_requirement;

pub use status::{OperationStatus, VehicleStatus};
