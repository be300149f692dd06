//! # Repository Layer
//!
//! This module contains the persistence gateway that encapsulates SeaORM
//! operations on the employees table.

pub mod employee;

pub use employee::{EmployeeGateway, EmployeePatch, EmployeeReplace, EmployeeRepository, NewEmployee};
