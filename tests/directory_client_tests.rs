//! Directory client behavior against a mocked API

use std::time::Duration;

use employee_directory::client::{ClientError, DirectoryClient, DirectoryView, ViewState};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn employees_json() -> serde_json::Value {
    json!([
        {
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "fullName": "Ana Gomez",
            "age": 30,
            "area": "IT",
            "seniority": 2,
            "phone": "555-1",
            "is_active": true,
            "created_at": "2025-01-15T10:30:00Z"
        },
        {
            "id": "550e8400-e29b-41d4-a716-446655440001",
            "fullname": "Luis Perez",
            "age": 41,
            "area": "HR",
            "seniority": 9,
            "phone": "555-2",
            "is_active": true,
            "created_at": "2025-01-16T10:30:00Z"
        }
    ])
}

#[tokio::test]
async fn fetches_and_decodes_employees() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(employees_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_secs(8)).unwrap();
    let employees = client.fetch_employees().await.unwrap();

    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0].full_name, "Ana Gomez");
    assert_eq!(employees[1].full_name, "Luis Perez");
}

#[tokio::test]
async fn slow_response_surfaces_timeout_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(employees_json())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_millis(100)).unwrap();

    let err = client.fetch_employees().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout));

    let mut view = DirectoryView::new();
    assert!(view.load(&client, &CancellationToken::new()).await);
    assert_eq!(
        view.state(),
        &ViewState::Failed("The request took too long".to_string())
    );
}

#[tokio::test]
async fn error_body_message_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": "INTERNAL_SERVER_ERROR",
            "message": "Error getting employees"
        })))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_secs(8)).unwrap();
    let err = client.fetch_employees().await.unwrap_err();

    assert_eq!(err.to_string(), "Error getting employees");
}

#[tokio::test]
async fn status_fallback_message_without_body() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/employees/{}", id)))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_secs(8)).unwrap();
    let err = client.fetch_employee_by_id(id).await.unwrap_err();

    assert_eq!(err.to_string(), "HTTP error! status: 502");
}

#[tokio::test]
async fn network_failure_surfaces_error_text() {
    let port = portpicker::pick_unused_port().expect("free port");
    let client =
        DirectoryClient::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2))
            .unwrap();

    let mut view = DirectoryView::new();
    assert!(view.load(&client, &CancellationToken::new()).await);

    match view.state() {
        ViewState::Failed(message) => assert!(!message.is_empty()),
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn teardown_abandons_in_flight_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(employees_json())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = DirectoryClient::new(&server.uri(), Duration::from_secs(8)).unwrap();
    let cancel = CancellationToken::new();
    let teardown = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        teardown.cancel();
    });

    let mut view = DirectoryView::new();
    assert!(!view.load(&client, &cancel).await);
    assert_eq!(view.state(), &ViewState::Loading);
}
