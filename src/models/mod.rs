//! # Data Models
//!
//! This module contains the data models used throughout the Employee Directory.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod employee;

pub use employee::Entity as Employee;
pub use employee::EmployeeRecord;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "employee-directory".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Probe response for `/healthz` and `/readyz`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
