//! # Employees API Handlers
//!
//! This module contains handlers for listing, reading, creating, updating and
//! deleting employees.

use crate::error::{ApiError, RepositoryError, validation_error};
use crate::models::EmployeeRecord;
use crate::repositories::{EmployeePatch, EmployeeReplace, NewEmployee};
use crate::server::AppState;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use metrics::counter;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request payload for creating an employee.
///
/// Every field is optional at the wire level so that missing and falsy values
/// can be reported together.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    #[serde(rename = "fullName", alias = "fullname", alias = "full_name")]
    #[schema(example = "Ana Gomez")]
    pub full_name: Option<String>,
    #[schema(example = 30)]
    pub age: Option<i32>,
    #[schema(example = "IT")]
    pub area: Option<String>,
    #[schema(example = 2)]
    pub seniority: Option<i32>,
    #[schema(example = "555-1")]
    pub phone: Option<String>,
    /// Defaults to true
    pub is_active: Option<bool>,
}

impl CreateEmployeeRequest {
    /// Names of required fields that are absent, blank, or zero
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !text_present(&self.full_name) {
            missing.push("fullName");
        }
        if !number_present(self.age) {
            missing.push("age");
        }
        if !text_present(&self.area) {
            missing.push("area");
        }
        if !number_present(self.seniority) {
            missing.push("seniority");
        }
        if !text_present(&self.phone) {
            missing.push("phone");
        }
        missing
    }

    fn into_new_employee(self) -> Option<NewEmployee> {
        Some(NewEmployee {
            full_name: self.full_name?,
            age: self.age?,
            area: self.area?,
            seniority: self.seniority?,
            phone: self.phone?,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

fn text_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn number_present(value: Option<i32>) -> bool {
    value.is_some_and(|v| v != 0)
}

/// Request payload for replacing every mutable field of an employee
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplaceEmployeeRequest {
    #[serde(rename = "fullName", alias = "fullname", alias = "full_name")]
    #[schema(example = "Ana Gomez")]
    pub full_name: String,
    #[schema(example = 31)]
    pub age: i32,
    #[schema(example = "Finance")]
    pub area: String,
    #[schema(example = 3)]
    pub seniority: i32,
    #[schema(example = "555-9")]
    pub phone: String,
    /// Omitted keeps the current status
    pub is_active: Option<bool>,
}

impl From<ReplaceEmployeeRequest> for EmployeeReplace {
    fn from(request: ReplaceEmployeeRequest) -> Self {
        Self {
            full_name: request.full_name,
            age: request.age,
            area: request.area,
            seniority: request.seniority,
            phone: request.phone,
            is_active: request.is_active,
        }
    }
}

/// Request payload for a partial update.
///
/// Only these keys are forwarded; anything else in the body is dropped.
/// An explicit `null` leaves the field unchanged. A body that changes nothing
/// returns the current row.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PatchEmployeeRequest {
    #[serde(
        rename = "fullName",
        alias = "fullname",
        alias = "full_name",
        default,
        deserialize_with = "deserialize_some"
    )]
    #[schema(value_type = Option<String>)]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub age: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, example = "HR")]
    pub area: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i32>)]
    pub seniority: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<bool>)]
    pub is_active: Option<Option<bool>>,
}

impl PatchEmployeeRequest {
    /// Supplied string fields that are blank
    fn blank_fields(&self) -> Vec<&'static str> {
        let mut blank = Vec::new();
        for (name, value) in [
            ("fullName", &self.full_name),
            ("area", &self.area),
            ("phone", &self.phone),
        ] {
            if let Some(Some(text)) = value
                && text.trim().is_empty()
            {
                blank.push(name);
            }
        }
        blank
    }
}

impl From<PatchEmployeeRequest> for EmployeePatch {
    fn from(request: PatchEmployeeRequest) -> Self {
        Self {
            full_name: request.full_name.flatten(),
            age: request.age.flatten(),
            area: request.area.flatten(),
            seniority: request.seniority.flatten(),
            phone: request.phone.flatten(),
            is_active: request.is_active.flatten(),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`)
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Counts the request under `employee_requests_total` and passes the result through
fn observe<T>(operation: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(err) if err.status == StatusCode::NOT_FOUND => "not_found",
        Err(err) if err.status.is_client_error() => "client_error",
        Err(_) => "error",
    };
    counter!("employee_requests_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    result
}

fn employee_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Employee not found")
}

/// Invalid ids can never match a row
fn parse_employee_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Generic 500 that keeps the underlying error in the logs only
fn store_failure(message: &'static str, error: RepositoryError) -> ApiError {
    tracing::error!(error = %error, "{}", message);
    ApiError::internal(message)
}

/// Error for deactivate/destroy. Not-found surfaces as a 500 carrying the
/// underlying message unless `normalize_not_found` is enabled.
fn removal_failure(state: &AppState, operation: &str, error: RepositoryError) -> ApiError {
    match error {
        RepositoryError::NotFound(message) if state.config.normalize_not_found => {
            ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", message.as_str())
        }
        other => {
            tracing::error!(error = %other, operation, "Employee removal failed");
            ApiError::internal(&other.to_string())
        }
    }
}

/// List active employees
#[utoipa::path(
    get,
    path = "/employees",
    responses(
        (status = 200, description = "Active employees ordered by name", body = Vec<EmployeeRecord>),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn list_active_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    let result = async {
        let employees = state
            .gateway
            .list_active()
            .await
            .map_err(|e| store_failure("Error getting employees", e))?;
        Ok::<_, ApiError>(Json(employees.into_iter().map(EmployeeRecord::from).collect()))
    }
    .await;

    observe("list_active", result)
}

/// List all employees, including inactive ones
#[utoipa::path(
    get,
    path = "/employees/all",
    responses(
        (status = 200, description = "All employees ordered by name", body = Vec<EmployeeRecord>),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn list_all_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    let result = async {
        let employees = state
            .gateway
            .list_all()
            .await
            .map_err(|e| store_failure("Error getting all employees", e))?;
        Ok::<_, ApiError>(Json(employees.into_iter().map(EmployeeRecord::from).collect()))
    }
    .await;

    observe("list_all", result)
}

/// Fetch a single employee
#[utoipa::path(
    get,
    path = "/employees/{id}",
    params(("id" = String, Path, description = "Employee id (UUID)")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeRecord),
        (status = 404, description = "Employee not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let result = async {
        let id = parse_employee_id(&id).ok_or_else(employee_not_found)?;
        let employee = state
            .gateway
            .get_by_id(id)
            .await
            .map_err(|e| store_failure("Error getting employee", e))?
            .ok_or_else(employee_not_found)?;
        Ok::<_, ApiError>(Json(EmployeeRecord::from(employee)))
    }
    .await;

    observe("get", result)
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeRecord, headers(
            ("Location", description = "URL of the created employee"),
            ("X-Trace-Id", description = "Trace identifier for request correlation")
        )),
        (status = 400, description = "Missing required fields", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, [(&'static str, String); 1], Json<EmployeeRecord>), ApiError> {
    let result = async {
        let Json(request) = payload?;

        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(validation_error(
                "Missing required fields",
                json!({ "missing": missing }),
            ));
        }
        let new_employee = request.into_new_employee().ok_or_else(|| {
            validation_error("Missing required fields", json!({ "missing": [] }))
        })?;

        let created = state
            .gateway
            .create(new_employee)
            .await
            .map_err(|e| match e {
                RepositoryError::Validation(_) => ApiError::from(e),
                other => store_failure("Error creating employee", other),
            })?;

        let location = format!("/employees/{}", created.id);
        Ok::<_, ApiError>((
            StatusCode::CREATED,
            [("Location", location)],
            Json(EmployeeRecord::from(created)),
        ))
    }
    .await;

    observe("create", result)
}

/// Replace every mutable field of an employee
#[utoipa::path(
    put,
    path = "/employees/{id}",
    params(("id" = String, Path, description = "Employee id (UUID)")),
    request_body = ReplaceEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeRecord),
        (status = 400, description = "Invalid body", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError),
        (status = 500, description = "Internal server error with error detail", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn replace_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceEmployeeRequest>, JsonRejection>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let result = async {
        let id = parse_employee_id(&id).ok_or_else(employee_not_found)?;
        let Json(request) = payload?;

        let updated = state
            .gateway
            .replace(id, request.into())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => employee_not_found(),
                RepositoryError::Validation(_) | RepositoryError::NoOp => ApiError::from(e),
                RepositoryError::Database(_) => {
                    tracing::error!(error = %e, "Error updating employee");
                    ApiError::internal("Error updating employee")
                        .with_details(json!({ "error": e.to_string() }))
                }
            })?;

        Ok::<_, ApiError>(Json(EmployeeRecord::from(updated)))
    }
    .await;

    observe("replace", result)
}

/// Update only the supplied fields of an employee
#[utoipa::path(
    patch,
    path = "/employees/{id}",
    params(("id" = String, Path, description = "Employee id (UUID)")),
    request_body = PatchEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeRecord),
        (status = 400, description = "Empty body or blank field", body = ApiError),
        (status = 404, description = "Employee not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn patch_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let result = async {
        let Json(body) = payload?;
        if body.is_empty() {
            return Err(ApiError::from(RepositoryError::NoOp));
        }

        let request: PatchEmployeeRequest =
            serde_json::from_value(Value::Object(body)).map_err(|e| {
                validation_error("Invalid patch body", json!({ "error": e.to_string() }))
            })?;

        let blank = request.blank_fields();
        if !blank.is_empty() {
            return Err(validation_error(
                "Fields cannot be empty",
                json!({ "blank": blank }),
            ));
        }

        let id = parse_employee_id(&id).ok_or_else(employee_not_found)?;

        // Only unknown keys or nulls: nothing to write, answer with the current row
        let patch = EmployeePatch::from(request);
        if patch.is_empty() {
            let current = state
                .gateway
                .get_by_id(id)
                .await
                .map_err(|e| store_failure("Error updating employee", e))?
                .ok_or_else(employee_not_found)?;
            return Ok(Json(EmployeeRecord::from(current)));
        }

        let updated = state
            .gateway
            .patch(id, patch)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => employee_not_found(),
                RepositoryError::Validation(_) | RepositoryError::NoOp => ApiError::from(e),
                RepositoryError::Database(_) => store_failure("Error updating employee", e),
            })?;

        Ok::<_, ApiError>(Json(EmployeeRecord::from(updated)))
    }
    .await;

    observe("patch", result)
}

/// Soft delete an employee
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    params(("id" = String, Path, description = "Employee id (UUID)")),
    responses(
        (status = 200, description = "Employee deactivated", body = EmployeeRecord),
        (status = 404, description = "Employee not found (only with normalized not-found)", body = ApiError),
        (status = 500, description = "Failure carrying the underlying message", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn deactivate_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let result = async {
        let uuid = parse_employee_id(&id).ok_or_else(|| {
            removal_failure(&state, "deactivate", unknown_id(&id))
        })?;
        let updated = state
            .gateway
            .deactivate(uuid)
            .await
            .map_err(|e| removal_failure(&state, "deactivate", e))?;
        Ok::<_, ApiError>(Json(EmployeeRecord::from(updated)))
    }
    .await;

    observe("deactivate", result)
}

/// Permanently delete an employee
#[utoipa::path(
    delete,
    path = "/employees/hard/{id}",
    params(("id" = String, Path, description = "Employee id (UUID)")),
    responses(
        (status = 200, description = "Employee removed; body is the removed row", body = EmployeeRecord),
        (status = 404, description = "Employee not found (only with normalized not-found)", body = ApiError),
        (status = 500, description = "Failure carrying the underlying message", body = ApiError)
    ),
    tag = "employees"
)]
pub async fn destroy_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let result = async {
        let uuid = parse_employee_id(&id).ok_or_else(|| {
            removal_failure(&state, "destroy", unknown_id(&id))
        })?;
        let removed = state
            .gateway
            .destroy(uuid)
            .await
            .map_err(|e| removal_failure(&state, "destroy", e))?;
        Ok::<_, ApiError>(Json(EmployeeRecord::from(removed)))
    }
    .await;

    observe("destroy", result)
}

fn unknown_id(raw: &str) -> RepositoryError {
    RepositoryError::NotFound(format!("Employee with id {} not found", raw))
}
