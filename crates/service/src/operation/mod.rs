//! Operation resource. An operation owns an ordered list of vehicle type
//! requirements that is stored alongside it.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::OperationService;
