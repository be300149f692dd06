//! Employee entity model
//!
//! This module contains the SeaORM entity model for the employees table and
//! the JSON record exchanged over HTTP.

use chrono::{DateTime, Utc};
use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee row. `is_active = false` marks a soft-deleted employee.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Unique identifier assigned at creation (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub full_name: String,

    pub age: i32,

    /// Grouping key for the directory view
    pub area: String,

    /// Years of tenure
    pub seniority: i32,

    pub phone: String,

    pub is_active: bool,

    /// Timestamp when the employee was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Employee as returned by the API and consumed by the directory client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeRecord {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[serde(rename = "fullName", alias = "fullname", alias = "full_name")]
    #[schema(example = "Ana Gomez")]
    pub full_name: String,
    #[schema(example = 30)]
    pub age: i32,
    #[schema(example = "IT")]
    pub area: String,
    #[schema(example = 2)]
    pub seniority: i32,
    #[schema(example = "555-1")]
    pub phone: String,
    #[schema(example = true)]
    pub is_active: bool,
    #[schema(example = "2025-01-15T10:30:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<Model> for EmployeeRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            age: model.age,
            area: model.area,
            seniority: model.seniority,
            phone: model.phone,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
