use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::operation::repo::seaorm::SeaOrmOperationRepository;
use service::operation::repository::OperationRepository;
use service::storage::MemoryStore;
use service::vehicle::repo::seaorm::SeaOrmVehicleRepository;
use service::vehicle::repository::VehicleRepository;
use service::vehicle_type::repo::seaorm::SeaOrmVehicleTypeRepository;
use service::vehicle_type::repository::VehicleTypeRepository;
use service::{OperationService, VehicleService, VehicleTypeService};

pub type DynVehicleTypeService = VehicleTypeService<dyn VehicleTypeRepository>;
pub type DynVehicleService = VehicleService<dyn VehicleRepository, dyn VehicleTypeRepository>;
pub type DynOperationService = OperationService<dyn OperationRepository, dyn VehicleTypeRepository>;

/// Services shared by all handlers, independent of the storage backend.
#[derive(Clone)]
pub struct AppState {
    pub vehicle_types: Arc<DynVehicleTypeService>,
    pub vehicles: Arc<DynVehicleService>,
    pub operations: Arc<DynOperationService>,
}

impl AppState {
    pub fn from_repos(
        vehicle_types: Arc<dyn VehicleTypeRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        operations: Arc<dyn OperationRepository>,
        enforce_status_transitions: bool,
    ) -> Self {
        Self {
            vehicle_types: Arc::new(VehicleTypeService::new(vehicle_types.clone())),
            vehicles: Arc::new(VehicleService::new(vehicles, vehicle_types.clone())),
            operations: Arc::new(
                OperationService::new(operations, vehicle_types).with_status_transitions(enforce_status_transitions),
            ),
        }
    }

    pub fn postgres(db: DatabaseConnection, enforce_status_transitions: bool) -> Self {
        Self::from_repos(
            Arc::new(SeaOrmVehicleTypeRepository { db: db.clone() }),
            Arc::new(SeaOrmVehicleRepository { db: db.clone() }),
            Arc::new(SeaOrmOperationRepository { db }),
            enforce_status_transitions,
        )
    }

    pub fn memory(enforce_status_transitions: bool) -> Self {
        let store = MemoryStore::new();
        Self::from_repos(
            Arc::new(store.vehicle_types()),
            Arc::new(store.vehicles()),
            Arc::new(store.operations()),
            enforce_status_transitions,
        )
    }
}
