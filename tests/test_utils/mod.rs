//! Test utilities for database and live-server testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations and for serving the API on a free local port.

#![allow(dead_code)]

use anyhow::{Context, Result};
use employee_directory::config::AppConfig;
use employee_directory::server::{AppState, create_app};
use migration::{Migrator, MigratorTrait};
use portpicker::pick_unused_port;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);
    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

pub struct TestServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<Result<()>>>,
}

impl TestServerHandle {
    fn new(shutdown_tx: oneshot::Sender<()>, join_handle: JoinHandle<Result<()>>) -> Self {
        Self {
            shutdown_tx: Some(shutdown_tx),
            join_handle: Some(join_handle),
        }
    }

    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(handle) = self.join_handle.take() {
            let result = handle.await.context("server task join failed")?;
            result?;
        }

        Ok(())
    }
}

impl Drop for TestServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Serves the API backed by a fresh in-memory database on an unused port.
///
/// Returns the base URL and a handle that stops the server.
pub async fn spawn_test_app(config: AppConfig) -> (String, TestServerHandle) {
    let db = setup_test_db().await.expect("test database");
    let app = create_app(AppState::new(config, db)).expect("router builds");

    let port = pick_unused_port().expect("no free port available");
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .expect("bind test listener");
    let server_url = format!("http://127.0.0.1:{}", port);

    let (ready_tx, ready_rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_task = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        let _ = ready_tx.send(());

        server.await.context("axum server error")
    });

    ready_rx.await.expect("server task to signal readiness");

    (server_url, TestServerHandle::new(shutdown_tx, server_task))
}
