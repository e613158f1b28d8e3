//! Gateway routes driven end to end through the real PortfolioServer.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use portfolio_gateway::{build_router, cors_layer};
use portfolio_metrics::NopSink;
use portfolio_rpc::PortfolioServer;
use portfolio_store::*;

struct UnavailableEducations;

#[async_trait]
impl Repository for UnavailableEducations {
    type Record = Education;

    async fn list(&self) -> StoreResult<Vec<Education>> {
        Err(StoreError::database(Entity::Education, sqlx::Error::PoolTimedOut))
    }

    async fn get(&self, _id: i64) -> StoreResult<Education> {
        Err(StoreError::database(Entity::Education, sqlx::Error::PoolTimedOut))
    }
}

fn app(origin: &str) -> Router {
    let skills = MemoryRepository::new([
        Skill {
            id: 1,
            title: "Rust".into(),
            level: 5,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            updated_at: None,
        },
        Skill {
            id: 2,
            title: "PostgreSQL".into(),
            level: 4,
            created_at: None,
            updated_at: None,
        },
    ]);

    let experiences = MemoryRepository::new([Experience {
        id: 7,
        title: "Platform Engineer".into(),
        description: "Ran the data plane".into(),
        company: Some(Company {
            name: "Initech".into(),
            url: Some("https://initech.test".into()),
            logo_url: None,
        }),
        languages: vec!["Rust".into(), "Go".into()],
        frameworks: vec!["tokio".into()],
        started_on: NaiveDate::from_ymd_opt(2021, 6, 14),
        ended_on: None,
        created_at: None,
        updated_at: None,
    }]);

    let server = PortfolioServer::new(
        Arc::new(skills),
        Arc::new(experiences),
        Arc::new(UnavailableEducations),
        Arc::new(NopSink),
    );

    build_router(Arc::new(server), cors_layer(origin).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn list_skills_renders_protobuf_json() {
    let (status, body) = get(app("*"), "/v1/skills").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "skills": [
                {"id": "1", "title": "Rust", "level": 5, "createdAt": "2024-01-02T03:04:05Z"},
                {"id": "2", "title": "PostgreSQL", "level": 4}
            ]
        })
    );
}

#[tokio::test]
async fn get_skill_by_id() {
    let (status, body) = get(app("*"), "/v1/skills/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skill"]["title"], "PostgreSQL");
}

#[tokio::test]
async fn missing_skill_is_404_with_grpc_body() {
    let (status, body) = get(app("*"), "/v1/skills/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"code": 5, "message": "skill not found", "details": []})
    );
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let (status, body) = get(app("*"), "/v1/experiences/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3);
}

#[tokio::test]
async fn experience_fields_follow_json_mapping() {
    let (status, body) = get(app("*"), "/v1/experiences/7").await;
    assert_eq!(status, StatusCode::OK);

    let exp = &body["experience"];
    assert_eq!(exp["id"], "7");
    assert_eq!(exp["technologies"], json!(["Rust", "Go"]));
    assert_eq!(exp["frameworks"], json!(["tokio"]));
    assert_eq!(exp["startedAt"], json!({"year": 2021, "month": 6, "day": 14}));
    assert!(exp.get("endedAt").is_none());
    assert_eq!(exp["company"]["url"], "https://initech.test");
    assert!(exp["company"].get("logoUrl").is_none());
}

#[tokio::test]
async fn database_failure_is_500() {
    let (status, body) = get(app("*"), "/v1/educations").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 13);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("failed to query education")
    );
}

#[tokio::test]
async fn unknown_path_is_404() {
    let (status, body) = get(app("*"), "/v2/skills").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5);
}

#[tokio::test]
async fn preflight_is_answered_with_configured_origin() {
    let resp = app("https://portfolio.example.com")
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/v1/skills")
                .header(header::ORIGIN, "https://portfolio.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://portfolio.example.com"
    );
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "{methods}");
    }
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("authorization"));
}

#[tokio::test]
async fn wildcard_origin_on_plain_requests() {
    let resp = app("*")
        .oneshot(
            Request::builder()
                .uri("/v1/skills")
                .header(header::ORIGIN, "https://anywhere.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

async fn options(app: Router, uri: &str, origin: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn options_without_request_method_is_200() {
    let resp = options(
        app("https://portfolio.example.com"),
        "/v1/skills/2",
        "https://portfolio.example.com",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://portfolio.example.com"
    );
}

#[tokio::test]
async fn options_on_unknown_path_is_200() {
    let resp = options(app("*"), "/v2/anything", "https://anywhere.test").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn other_methods_on_routed_paths_are_rejected() {
    let resp = app("*")
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/v1/skills/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
