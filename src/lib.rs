//! # Employee Directory Library
//!
//! This library provides the core functionality for the Employee Directory
//! service: the persistence gateway, HTTP handlers, server configuration, and
//! the directory client that consumes the API.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
