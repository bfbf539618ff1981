use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{CreateOperation, Operation, OperationFilter, OperationRequirement, OperationStatus, UpdateOperation};
use super::repository::OperationRepository;
use crate::errors::ServiceError;
use crate::repository::CrudRepository;
use crate::vehicle_type::repository::VehicleTypeRepository;

/// Operation business rules and requirement reconciliation.
///
/// Every requirement must name an existing vehicle type. Replacing the
/// requirement list on update is full-replace; single requirements are
/// managed through [`add_requirement`](Self::add_requirement),
/// [`update_requirement`](Self::update_requirement) and
/// [`remove_requirement`](Self::remove_requirement).
pub struct OperationService<R: OperationRepository + ?Sized, T: VehicleTypeRepository + ?Sized> {
    repo: Arc<R>,
    vehicle_types: Arc<T>,
    enforce_status_transitions: bool,
}

impl<R, T> OperationService<R, T>
where
    R: OperationRepository + ?Sized,
    T: VehicleTypeRepository + ?Sized,
{
    pub fn new(repo: Arc<R>, vehicle_types: Arc<T>) -> Self {
        Self { repo, vehicle_types, enforce_status_transitions: false }
    }

    /// Reject status changes outside PLANNING -> ACTIVE -> COMPLETED / CANCELLED.
    pub fn with_status_transitions(mut self, enforce: bool) -> Self {
        self.enforce_status_transitions = enforce;
        self
    }

    async fn ensure_vehicle_types(&self, reqs: &[OperationRequirement]) -> Result<(), ServiceError> {
        let mut checked = HashSet::new();
        for r in reqs {
            if !checked.insert(r.vehicle_type_id) {
                continue;
            }
            if self.vehicle_types.find_by_id(r.vehicle_type_id).await?.is_none() {
                debug!(vehicle_type_id = %r.vehicle_type_id, "requirement names unknown vehicle type");
                return Err(ServiceError::not_found("Vehicle type"));
            }
        }
        Ok(())
    }

    fn check_transition(&self, from: OperationStatus, to: OperationStatus) -> Result<(), ServiceError> {
        if self.enforce_status_transitions && !from.can_transition_to(to) {
            debug!(%from, %to, "status transition rejected");
            return Err(ServiceError::conflict(format!("Cannot change operation status from {} to {}", from, to)));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(name = %input.name, requirements = input.requirements.len()))]
    pub async fn create(&self, input: CreateOperation) -> Result<Operation, ServiceError> {
        self.ensure_vehicle_types(&input.requirements).await?;
        let created = self.repo.create(input).await?;
        info!(entity = "operation", id = %created.id, "created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Operation, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Operation"))
    }

    pub async fn find_all(&self, filter: OperationFilter) -> Result<Vec<Operation>, ServiceError> {
        self.repo.find_all(filter).await
    }

    /// An unknown vehicle type simply has no operations.
    pub async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Operation>, ServiceError> {
        self.repo.find_by_vehicle_type(vehicle_type_id).await
    }

    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateOperation) -> Result<Operation, ServiceError> {
        let current = self.find_by_id(id).await?;
        if let Some(next) = input.status {
            self.check_transition(current.status, next)?;
        }
        if let Some(reqs) = input.requirements.as_deref() {
            self.ensure_vehicle_types(reqs).await?;
        }
        let replaced = input.requirements.is_some();

        let updated = self.repo.update(id, input).await?;
        info!(entity = "operation", id = %id, status = %updated.status, replaced_requirements = replaced, "updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.find_by_id(id).await?;
        self.repo.delete(id).await?;
        info!(entity = "operation", id = %id, "deleted");
        Ok(())
    }

    /// Insert the requirement, or overwrite the quantity when the operation
    /// already has one for that vehicle type.
    #[instrument(skip(self, requirement), fields(id = %operation_id, vehicle_type_id = %requirement.vehicle_type_id))]
    pub async fn add_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<Operation, ServiceError> {
        self.find_by_id(operation_id).await?;
        self.ensure_vehicle_types(std::slice::from_ref(&requirement)).await?;
        let op = self.repo.add_requirement(operation_id, requirement).await?;
        info!(entity = "operation", id = %operation_id, event = "requirement_upserted", "updated");
        Ok(op)
    }

    /// Returns `false` when nothing matched.
    #[instrument(skip(self), fields(id = %operation_id))]
    pub async fn remove_requirement(&self, operation_id: Uuid, vehicle_type_id: Uuid) -> Result<bool, ServiceError> {
        let removed = self.repo.remove_requirement(operation_id, vehicle_type_id).await?;
        if removed {
            info!(entity = "operation", id = %operation_id, %vehicle_type_id, event = "requirement_removed", "updated");
        } else {
            debug!(%vehicle_type_id, "no requirement to remove");
        }
        Ok(removed)
    }

    /// Change the quantity of an existing requirement. Fails with `NotFound`
    /// when the operation has no requirement for that vehicle type.
    #[instrument(skip(self, requirement), fields(id = %operation_id, vehicle_type_id = %requirement.vehicle_type_id))]
    pub async fn update_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<Operation, ServiceError> {
        self.find_by_id(operation_id).await?;
        if !self.repo.update_requirement(operation_id, requirement).await? {
            debug!("no requirement to update");
            return Err(ServiceError::not_found("Operation requirement"));
        }
        info!(entity = "operation", id = %operation_id, event = "requirement_updated", "updated");
        self.find_by_id(operation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{MemoryOperationRepository, MemoryVehicleTypeRepository};
    use crate::storage::MemoryStore;
    use crate::vehicle_type::domain::CreateVehicleType;

    type Svc = OperationService<MemoryOperationRepository, MemoryVehicleTypeRepository>;

    async fn setup(types: &[&str]) -> (Svc, Vec<Uuid>) {
        let store = MemoryStore::new();
        let vt_repo = Arc::new(store.vehicle_types());
        let mut ids = Vec::new();
        for name in types {
            let vt = vt_repo
                .create(CreateVehicleType { name: (*name).into(), description: None, capacity: None })
                .await
                .unwrap();
            ids.push(vt.id);
        }
        (OperationService::new(Arc::new(store.operations()), vt_repo), ids)
    }

    fn req(vehicle_type_id: Uuid, quantity: i32) -> OperationRequirement {
        OperationRequirement { vehicle_type_id, quantity }
    }

    fn demand(op: &Operation) -> Vec<OperationRequirement> {
        op.requirements
            .iter()
            .map(|r| OperationRequirement { vehicle_type_id: r.vehicle_type_id, quantity: r.quantity })
            .collect()
    }

    fn op(name: &str, requirements: Vec<OperationRequirement>) -> CreateOperation {
        CreateOperation { name: name.into(), description: None, status: None, requirements }
    }

    #[tokio::test]
    async fn create_defaults_to_planning_and_keeps_requirements() {
        let (svc, vt) = setup(&["Sedan", "Van"]).await;
        let created = svc.create(op("Airport run", vec![req(vt[1], 1), req(vt[0], 2)])).await.unwrap();
        assert_eq!(created.status, OperationStatus::Planning);
        assert!(created.requirements.iter().all(|r| r.operation_id == created.id));
        assert_eq!(created.requirements[0].vehicle_type.as_ref().map(|t| t.name.as_str()), Some("Van"));
        assert_eq!(demand(&created), vec![req(vt[1], 1), req(vt[0], 2)]);
        assert_eq!(svc.find_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_rejects_unknown_vehicle_type() {
        let (svc, vt) = setup(&["Sedan"]).await;
        let err = svc.create(op("x", vec![req(vt[0], 1), req(Uuid::new_v4(), 1)])).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Vehicle type not found"));
        assert!(svc.find_all(OperationFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_the_whole_requirement_set() {
        let (svc, vt) = setup(&["Sedan", "Van"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 2), req(vt[1], 1)])).await.unwrap();

        let upd = UpdateOperation { requirements: Some(vec![req(vt[0], 5)]), ..Default::default() };
        let updated = svc.update(created.id, upd).await.unwrap();
        assert_eq!(demand(&updated), vec![req(vt[0], 5)]);

        let renamed = svc
            .update(created.id, UpdateOperation { name: Some("renamed".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "renamed");
        assert_eq!(demand(&renamed), vec![req(vt[0], 5)]);
    }

    #[tokio::test]
    async fn update_rejects_unknown_vehicle_type_without_touching_requirements() {
        let (svc, vt) = setup(&["Sedan"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 2)])).await.unwrap();
        let upd = UpdateOperation {
            name: Some("changed".into()),
            requirements: Some(vec![req(Uuid::new_v4(), 1)]),
            ..Default::default()
        };
        assert!(matches!(svc.update(created.id, upd).await, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.find_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn status_is_free_unless_transitions_are_enforced() {
        let (svc, vt) = setup(&["Sedan"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 1)])).await.unwrap();
        let completed = UpdateOperation { status: Some(OperationStatus::Completed), ..Default::default() };
        let back = UpdateOperation { status: Some(OperationStatus::Planning), ..Default::default() };
        svc.update(created.id, completed.clone()).await.unwrap();
        assert_eq!(svc.update(created.id, back.clone()).await.unwrap().status, OperationStatus::Planning);

        let strict = svc.with_status_transitions(true);
        let err = strict.update(created.id, completed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let active = UpdateOperation { status: Some(OperationStatus::Active), ..Default::default() };
        assert_eq!(strict.update(created.id, active).await.unwrap().status, OperationStatus::Active);
        assert!(strict.update(created.id, back).await.is_err());
    }

    #[tokio::test]
    async fn add_requirement_upserts() {
        let (svc, vt) = setup(&["Sedan", "Van"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 1)])).await.unwrap();

        svc.add_requirement(created.id, req(vt[1], 2)).await.unwrap();
        let after = svc.add_requirement(created.id, req(vt[1], 7)).await.unwrap();
        assert_eq!(demand(&after), vec![req(vt[0], 1), req(vt[1], 7)]);

        let err = svc.add_requirement(created.id, req(Uuid::new_v4(), 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Vehicle type not found"));
        let err = svc.add_requirement(Uuid::new_v4(), req(vt[0], 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Operation not found"));
    }

    #[tokio::test]
    async fn remove_requirement_reports_whether_anything_matched() {
        let (svc, vt) = setup(&["Sedan", "Van"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 1), req(vt[1], 1)])).await.unwrap();

        assert!(svc.remove_requirement(created.id, vt[1]).await.unwrap());
        assert!(!svc.remove_requirement(created.id, vt[1]).await.unwrap());
        assert!(!svc.remove_requirement(Uuid::new_v4(), vt[0]).await.unwrap());
        assert_eq!(demand(&svc.find_by_id(created.id).await.unwrap()), vec![req(vt[0], 1)]);
    }

    #[tokio::test]
    async fn update_requirement_fails_when_absent() {
        let (svc, vt) = setup(&["Sedan", "Van"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 1)])).await.unwrap();

        let updated = svc.update_requirement(created.id, req(vt[0], 4)).await.unwrap();
        assert_eq!(demand(&updated), vec![req(vt[0], 4)]);

        let err = svc.update_requirement(created.id, req(vt[1], 4)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Operation requirement not found"));
        let err = svc.update_requirement(Uuid::new_v4(), req(vt[0], 4)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Operation not found"));
    }

    #[tokio::test]
    async fn lookups_by_vehicle_type_and_filters() {
        let (svc, vt) = setup(&["Sedan", "Van"]).await;
        let a = svc.create(op("Airport run", vec![req(vt[0], 1)])).await.unwrap();
        let b = svc.create(op("Harbour shuttle", vec![req(vt[0], 1), req(vt[1], 3)])).await.unwrap();
        svc.update(b.id, UpdateOperation { status: Some(OperationStatus::Active), ..Default::default() })
            .await
            .unwrap();

        let vans = svc.find_by_vehicle_type(vt[1]).await.unwrap();
        assert_eq!(vans.iter().map(|o| o.id).collect::<Vec<_>>(), vec![b.id]);
        assert!(svc.find_by_vehicle_type(Uuid::new_v4()).await.unwrap().is_empty());

        let all = svc.find_all(OperationFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|o| o.id).collect::<Vec<_>>(), vec![b.id, a.id]);

        let airport = svc.find_all(OperationFilter { name: Some("AIRPORT".into()), ..Default::default() }).await.unwrap();
        assert_eq!(airport.len(), 1);
        let active = svc
            .find_all(OperationFilter { status: Some(OperationStatus::Active), vehicle_type_id: Some(vt[0]), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(active.iter().map(|o| o.id).collect::<Vec<_>>(), vec![b.id]);
    }

    #[tokio::test]
    async fn delete_removes_operation_and_requirements() {
        let (svc, vt) = setup(&["Sedan"]).await;
        let created = svc.create(op("x", vec![req(vt[0], 1)])).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(matches!(svc.find_by_id(created.id).await, Err(ServiceError::NotFound(_))));
        assert!(svc.find_by_vehicle_type(vt[0]).await.unwrap().is_empty());
        assert!(matches!(svc.delete(created.id).await, Err(ServiceError::NotFound(_))));
    }
}
