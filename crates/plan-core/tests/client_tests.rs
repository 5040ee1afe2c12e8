#![cfg(feature = "rest_client")]

use std::net::SocketAddr;

use axum::{Json, Router, http::StatusCode, routing::get};
use resource_plan::{ApiClient, PlanError};
use serde_json::{Value, json};

async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn backend(fail_departments: bool) -> Router {
    let departments = if fail_departments {
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(Value::Null)) })
    } else {
        get(|| async { (StatusCode::OK, Json(json!([]))) })
    };
    Router::new()
        .route(
            "/resource-plans",
            get(|| async {
                Json(json!([
                    {"id": 1, "project_id": 10, "business_unit_name": "VSS",
                     "project_role_id": 1, "project_role_name": "PM",
                     "year": 2025, "month": 6, "planned_hours": 0.5}
                ]))
            }),
        )
        .route(
            "/worklogs/role-summary",
            get(|| async {
                Json(json!([{"position_id": 1, "year": 2025, "month": 6, "total_fte": 0.4}]))
            }),
        )
        .route(
            "/business-units",
            get(|| async { Json(json!([{"id": 1, "name": "VSS"}])) }),
        )
        .route(
            "/product-lines",
            get(|| async { Json(json!([{"id": 10, "business_unit_id": 1, "name": "Cameras"}])) }),
        )
        .route(
            "/product-lines/:id/projects",
            get(|| async {
                Json(json!([{"id": 100, "product_line_id": 10, "name": "Doorbell", "code": "DB"}]))
            }),
        )
        .route("/departments", departments)
        .route("/sub-teams", get(|| async { Json(json!([])) }))
        .route(
            "/sub-teams/:id/users",
            get(|| async {
                Json(json!([
                    {"id": 2, "sub_team_id": 5, "name": "Zoe"},
                    {"id": 1, "sub_team_id": 5, "name": "Adam", "code": "E001"}
                ]))
            }),
        )
}

#[tokio::test]
async fn fetches_complete_snapshot() {
    let addr = spawn_backend(backend(false)).await;
    let client = ApiClient::new(format!("http://{addr}/")).with_token("secret");
    assert_eq!(client.base_url(), format!("http://{addr}"));

    let snapshot = client.fetch_snapshot().await.unwrap();
    assert_eq!(snapshot.resource_plans.len(), 1);
    assert_eq!(
        snapshot.resource_plans[0].business_unit_name.as_deref(),
        Some("VSS")
    );
    assert_eq!(snapshot.worklog_summaries[0].total_fte, 0.4);
    assert_eq!(snapshot.product_lines[0].name, "Cameras");
    assert!(snapshot.projects.is_empty());
    assert!(snapshot.users.is_empty());

    let projects = client.line_projects(10).await.unwrap();
    assert_eq!(projects[0].name, "Doorbell");
    assert!(projects[0].loaded);

    let users = client.team_users(5).await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].code.as_deref(), Some("E001"));
}

#[tokio::test]
async fn failing_endpoint_fails_the_snapshot() {
    let addr = spawn_backend(backend(true)).await;
    let client = ApiClient::new(format!("http://{addr}"));

    let err = client.fetch_snapshot().await.unwrap_err();
    assert!(
        matches!(err, PlanError::Api { status: 503, .. }),
        "unexpected error: {err}"
    );
}
