//! Fleet operations service layer.
//! - Request schemas and their validation rules per resource.
//! - A storage contract (`CrudRepository` plus per-entity lookups) with SeaORM and in-memory backends.
//! - Services enforcing uniqueness and referential rules before touching storage.

pub mod errors;
pub mod operation;
pub mod repository;
pub mod serde_ext;
pub mod storage;
#[cfg(test)]
pub mod test_support;
pub mod vehicle;
pub mod vehicle_type;

pub use operation::OperationService;
pub use vehicle::VehicleService;
pub use vehicle_type::VehicleTypeService;
