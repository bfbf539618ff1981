//! Vehicle type resource: schema, repository contract and service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::VehicleTypeService;
