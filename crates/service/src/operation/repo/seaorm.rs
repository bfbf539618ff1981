use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use models::{operation, operation_requirement, vehicle_type};

use crate::errors::ServiceError;
use crate::operation::domain::{CreateOperation, Operation, OperationFilter, OperationRequirement, UpdateOperation};
use crate::operation::repository::OperationRepository;
use crate::repository::CrudRepository;
use crate::storage::sql::contains_ci;

/// SeaORM-backed repository. Multi-row writes run in one transaction, and
/// every requirement change bumps the operation's `updated_at`.
#[derive(Clone)]
pub struct SeaOrmOperationRepository {
    pub db: DatabaseConnection,
}

fn operations_with_type(vehicle_type_id: Uuid) -> SelectStatement {
    Query::select()
        .column(operation_requirement::Column::OperationId)
        .from(operation_requirement::Entity)
        .and_where(Expr::col(operation_requirement::Column::VehicleTypeId).eq(vehicle_type_id))
        .to_owned()
}

async fn insert_requirements<C: ConnectionTrait>(
    conn: &C,
    operation_id: Uuid,
    first_position: i32,
    reqs: Vec<OperationRequirement>,
) -> Result<(), ServiceError> {
    if reqs.is_empty() {
        return Ok(());
    }
    let now = Utc::now().into();
    let rows = reqs.into_iter().zip(first_position..).map(|(r, position)| operation_requirement::ActiveModel {
        id: Set(Uuid::new_v4()),
        operation_id: Set(operation_id),
        vehicle_type_id: Set(r.vehicle_type_id),
        quantity: Set(r.quantity),
        position: Set(position),
        created_at: Set(now),
    });
    operation_requirement::Entity::insert_many(rows).exec(conn).await?;
    Ok(())
}

type RequirementRow = (operation_requirement::Model, Option<vehicle_type::Model>);

/// Requirement rows joined with their vehicle types for several operations
/// in one query, keyed by operation id.
async fn load_requirements<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<RequirementRow>>, ServiceError> {
    let mut by_op: HashMap<Uuid, Vec<RequirementRow>> = HashMap::new();
    if ids.is_empty() {
        return Ok(by_op);
    }
    let rows = operation_requirement::Entity::find()
        .filter(operation_requirement::Column::OperationId.is_in(ids.iter().copied()))
        .find_also_related(vehicle_type::Entity)
        .order_by_asc(operation_requirement::Column::Position)
        .all(conn)
        .await?;
    for row in rows {
        by_op.entry(row.0.operation_id).or_default().push(row);
    }
    Ok(by_op)
}

async fn assemble<C: ConnectionTrait>(conn: &C, models: Vec<operation::Model>) -> Result<Vec<Operation>, ServiceError> {
    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
    let mut reqs = load_requirements(conn, &ids).await?;
    Ok(models
        .into_iter()
        .map(|m| {
            let rows = reqs.remove(&m.id).unwrap_or_default();
            Operation::from_parts(m, rows)
        })
        .collect())
}

async fn load_one<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Operation>, ServiceError> {
    let Some(model) = operation::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![model]).await?.pop())
}

async fn touch<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), ServiceError> {
    operation::Entity::update_many()
        .col_expr(operation::Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(operation::Column::Id.eq(id))
        .exec(conn)
        .await?;
    Ok(())
}

#[async_trait]
impl CrudRepository<Operation, CreateOperation, UpdateOperation, OperationFilter> for SeaOrmOperationRepository {
    async fn create(&self, input: CreateOperation) -> Result<Operation, ServiceError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let model = operation::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            status: Set(input.status.unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        insert_requirements(&txn, model.id, 0, input.requirements).await?;
        let created = load_one(&txn, model.id).await?.ok_or_else(|| ServiceError::not_found("Operation"))?;
        txn.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, ServiceError> {
        load_one(&self.db, id).await
    }

    async fn find_all(&self, filter: OperationFilter) -> Result<Vec<Operation>, ServiceError> {
        let mut select = operation::Entity::find();
        if let Some(name) = filter.name.as_deref() {
            select = select.filter(contains_ci(operation::Column::Name, name));
        }
        if let Some(status) = filter.status {
            select = select.filter(operation::Column::Status.eq(status));
        }
        if let Some(vt) = filter.vehicle_type_id {
            select = select.filter(operation::Column::Id.in_subquery(operations_with_type(vt)));
        }
        let models = select.order_by_desc(operation::Column::CreatedAt).all(&self.db).await?;
        assemble(&self.db, models).await
    }

    async fn update(&self, id: Uuid, input: UpdateOperation) -> Result<Operation, ServiceError> {
        let txn = self.db.begin().await?;
        let mut am: operation::ActiveModel = operation::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("Operation"))?
            .into();
        if let Some(name) = input.name { am.name = Set(name); }
        if let Some(description) = input.description { am.description = Set(description); }
        if let Some(status) = input.status { am.status = Set(status); }
        am.updated_at = Set(Utc::now().into());
        am.update(&txn).await?;

        if let Some(reqs) = input.requirements {
            operation_requirement::Entity::delete_many()
                .filter(operation_requirement::Column::OperationId.eq(id))
                .exec(&txn)
                .await?;
            insert_requirements(&txn, id, 0, reqs).await?;
        }

        let updated = load_one(&txn, id).await?.ok_or_else(|| ServiceError::not_found("Operation"))?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        operation_requirement::Entity::delete_many()
            .filter(operation_requirement::Column::OperationId.eq(id))
            .exec(&txn)
            .await?;
        let res = operation::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl OperationRepository for SeaOrmOperationRepository {
    async fn find_by_vehicle_type(&self, vehicle_type_id: Uuid) -> Result<Vec<Operation>, ServiceError> {
        self.find_all(OperationFilter { vehicle_type_id: Some(vehicle_type_id), ..Default::default() }).await
    }

    async fn add_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<Operation, ServiceError> {
        let txn = self.db.begin().await?;
        if operation::Entity::find_by_id(operation_id).one(&txn).await?.is_none() {
            return Err(ServiceError::not_found("Operation"));
        }

        let existing = operation_requirement::Entity::find()
            .filter(operation_requirement::Column::OperationId.eq(operation_id))
            .filter(operation_requirement::Column::VehicleTypeId.eq(requirement.vehicle_type_id))
            .one(&txn)
            .await?;
        match existing {
            Some(row) => {
                let mut am: operation_requirement::ActiveModel = row.into();
                am.quantity = Set(requirement.quantity);
                am.update(&txn).await?;
            }
            None => {
                let next = operation_requirement::Entity::find()
                    .filter(operation_requirement::Column::OperationId.eq(operation_id))
                    .order_by_desc(operation_requirement::Column::Position)
                    .one(&txn)
                    .await?
                    .map_or(0, |last| last.position + 1);
                insert_requirements(&txn, operation_id, next, vec![requirement]).await?;
            }
        }
        touch(&txn, operation_id).await?;

        let op = load_one(&txn, operation_id).await?.ok_or_else(|| ServiceError::not_found("Operation"))?;
        txn.commit().await?;
        Ok(op)
    }

    async fn remove_requirement(&self, operation_id: Uuid, vehicle_type_id: Uuid) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        let res = operation_requirement::Entity::delete_many()
            .filter(operation_requirement::Column::OperationId.eq(operation_id))
            .filter(operation_requirement::Column::VehicleTypeId.eq(vehicle_type_id))
            .exec(&txn)
            .await?;
        let removed = res.rows_affected > 0;
        if removed {
            touch(&txn, operation_id).await?;
        }
        txn.commit().await?;
        Ok(removed)
    }

    async fn update_requirement(&self, operation_id: Uuid, requirement: OperationRequirement) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        let res = operation_requirement::Entity::update_many()
            .col_expr(operation_requirement::Column::Quantity, Expr::value(requirement.quantity))
            .filter(operation_requirement::Column::OperationId.eq(operation_id))
            .filter(operation_requirement::Column::VehicleTypeId.eq(requirement.vehicle_type_id))
            .exec(&txn)
            .await?;
        let matched = res.rows_affected > 0;
        if matched {
            touch(&txn, operation_id).await?;
        }
        txn.commit().await?;
        Ok(matched)
    }
}
