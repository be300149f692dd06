//! # Employee Repository
//!
//! This module contains the persistence gateway for employees: the
//! [`EmployeeGateway`] trait the API layer depends on, and its SeaORM-backed
//! implementation [`EmployeeRepository`].
//!
//! Every mutating operation runs inside a single database transaction, and
//! `create` returns the inserted row from the same `INSERT` statement instead
//! of re-reading it afterwards.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::employee::{
    ActiveModel as EmployeeActiveModel, Column, Entity as Employee, Model as EmployeeModel,
};

/// Data for creating a new employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub full_name: String,
    pub age: i32,
    pub area: String,
    pub seniority: i32,
    pub phone: String,
    pub is_active: bool,
}

impl NewEmployee {
    fn validate(&self) -> Result<(), RepositoryError> {
        require_text("fullName", &self.full_name)?;
        require_text("area", &self.area)?;
        require_text("phone", &self.phone)?;
        Ok(())
    }
}

/// Full replacement of an employee's mutable fields.
///
/// `is_active: None` keeps the current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReplace {
    pub full_name: String,
    pub age: i32,
    pub area: String,
    pub seniority: i32,
    pub phone: String,
    pub is_active: Option<bool>,
}

impl EmployeeReplace {
    fn validate(&self) -> Result<(), RepositoryError> {
        require_text("fullName", &self.full_name)?;
        require_text("area", &self.area)?;
        require_text("phone", &self.phone)?;
        Ok(())
    }
}

/// Partial update: `Some` overwrites the field, `None` leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeePatch {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub area: Option<String>,
    pub seniority: Option<i32>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

impl EmployeePatch {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.age.is_none()
            && self.area.is_none()
            && self.seniority.is_none()
            && self.phone.is_none()
            && self.is_active.is_none()
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        if let Some(full_name) = &self.full_name {
            require_text("fullName", full_name)?;
        }
        if let Some(area) = &self.area {
            require_text("area", area)?;
        }
        if let Some(phone) = &self.phone {
            require_text("phone", phone)?;
        }
        Ok(())
    }

    fn apply(self, active: &mut EmployeeActiveModel) {
        if let Some(full_name) = self.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(age) = self.age {
            active.age = Set(age);
        }
        if let Some(area) = self.area {
            active.area = Set(area);
        }
        if let Some(seniority) = self.seniority {
            active.seniority = Set(seniority);
        }
        if let Some(phone) = self.phone {
            active.phone = Set(phone);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), RepositoryError> {
    if value.trim().is_empty() {
        return Err(RepositoryError::Validation(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(())
}

/// Units of work the directory performs against its store
#[async_trait]
pub trait EmployeeGateway: Send + Sync {
    /// Active employees ordered by full name
    async fn list_active(&self) -> Result<Vec<EmployeeModel>, RepositoryError>;

    /// All employees, including soft-deleted ones, ordered by full name
    async fn list_all(&self) -> Result<Vec<EmployeeModel>, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<EmployeeModel>, RepositoryError>;

    async fn create(&self, employee: NewEmployee) -> Result<EmployeeModel, RepositoryError>;

    async fn replace(
        &self,
        id: Uuid,
        fields: EmployeeReplace,
    ) -> Result<EmployeeModel, RepositoryError>;

    async fn patch(&self, id: Uuid, patch: EmployeePatch)
    -> Result<EmployeeModel, RepositoryError>;

    /// Soft delete
    async fn deactivate(&self, id: Uuid) -> Result<EmployeeModel, RepositoryError>;

    /// Hard delete, returning the removed row
    async fn destroy(&self, id: Uuid) -> Result<EmployeeModel, RepositoryError>;

    /// Round trip to the store for readiness checks
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// SeaORM implementation of [`EmployeeGateway`]
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository with the given connection pool
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeGateway for EmployeeRepository {
    async fn list_active(&self) -> Result<Vec<EmployeeModel>, RepositoryError> {
        let employees = Employee::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::FullName)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(employees)
    }

    async fn list_all(&self) -> Result<Vec<EmployeeModel>, RepositoryError> {
        let employees = Employee::find()
            .order_by_asc(Column::FullName)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(employees)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<EmployeeModel>, RepositoryError> {
        let employee = Employee::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(employee)
    }

    async fn create(&self, employee: NewEmployee) -> Result<EmployeeModel, RepositoryError> {
        employee.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let created = EmployeeActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(employee.full_name),
            age: Set(employee.age),
            area: Set(employee.area),
            seniority: Set(employee.seniority),
            phone: Set(employee.phone),
            is_active: Set(employee.is_active),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::debug!(employee_id = %created.id, "Employee created");
        Ok(created)
    }

    async fn replace(
        &self,
        id: Uuid,
        fields: EmployeeReplace,
    ) -> Result<EmployeeModel, RepositoryError> {
        fields.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let existing = Employee::find_by_id(id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::employee_not_found(id))?;

        let mut active = existing.into_active_model();
        active.full_name = Set(fields.full_name);
        active.age = Set(fields.age);
        active.area = Set(fields.area);
        active.seniority = Set(fields.seniority);
        active.phone = Set(fields.phone);
        if let Some(is_active) = fields.is_active {
            active.is_active = Set(is_active);
        }

        let updated = active
            .update(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(updated)
    }

    async fn patch(
        &self,
        id: Uuid,
        patch: EmployeePatch,
    ) -> Result<EmployeeModel, RepositoryError> {
        if patch.is_empty() {
            return Err(RepositoryError::NoOp);
        }
        patch.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let existing = Employee::find_by_id(id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::employee_not_found(id))?;

        let mut active = existing.into_active_model();
        patch.apply(&mut active);

        let updated = active
            .update(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(updated)
    }

    async fn deactivate(&self, id: Uuid) -> Result<EmployeeModel, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let existing = Employee::find_by_id(id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::employee_not_found(id))?;

        let mut active = existing.into_active_model();
        active.is_active = Set(false);

        let updated = active
            .update(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::debug!(employee_id = %id, "Employee deactivated");
        Ok(updated)
    }

    async fn destroy(&self, id: Uuid) -> Result<EmployeeModel, RepositoryError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        let existing = Employee::find_by_id(id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::employee_not_found(id))?;

        Employee::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(RepositoryError::database_error)?;

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::debug!(employee_id = %id, "Employee permanently deleted");
        Ok(existing)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.db
            .ping()
            .await
            .map_err(RepositoryError::database_error)
    }
}
