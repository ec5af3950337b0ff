//! Router-level tests: the middleware stack in front of the GraphQL handler.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use membership_core::common::MemberRole;
use membership_core::domains::auth::JwtService;
use membership_core::kernel::ServerDeps;
use membership_core::server::build_app;
use serde_json::{json, Value};
use test_context::test_context;
use tower::ServiceExt;

use crate::common::{create_member, TestHarness};

fn jwt() -> Arc<JwtService> {
    Arc::new(JwtService::new("http_test_secret", "http_test_issuer".to_string()))
}

fn app(ctx: &TestHarness, jwt_service: Arc<JwtService>) -> Router {
    build_app(ServerDeps::postgres(ctx.db_pool.clone(), jwt_service), &[])
}

fn graphql_request(query: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/graphql").header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_database_ok(ctx: &TestHarness) {
    let response = app(ctx, jwt())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bearer_token_authenticates_graphql_requests(ctx: &TestHarness) {
    let jwt_service = jwt();
    let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
    let token = jwt_service
        .create_token(member.id.into_uuid(), member.email.clone(), member.role)
        .unwrap();

    let response = app(ctx, jwt_service)
        .oneshot(graphql_request("{ me { email } }", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["me"]["email"], member.email.as_str());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn token_from_another_secret_is_ignored(ctx: &TestHarness) {
    let member = create_member(&ctx.db_pool, MemberRole::Admin).await.unwrap();
    let forged = JwtService::new("some_other_secret", "http_test_issuer".to_string())
        .create_token(member.id.into_uuid(), member.email.clone(), member.role)
        .unwrap();

    let response = app(ctx, jwt())
        .oneshot(graphql_request("{ me { email } }", Some(&forged)))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHORIZED");
}
