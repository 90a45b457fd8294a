#![allow(dead_code)]

use axum_test::TestServer;
use formly::domain::entities::{FieldDefinition, FieldType};
use formly::infrastructure::persistence::{MemoryFormRepository, MemoryTokenRepository};
use formly::routes::router_without_rate_limits;
use formly::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://forms.example.com";

/// Raw token of the owner `alice`.
pub const ALICE_TOKEN: &str = "alice-token";
/// Raw token of the owner `bob`.
pub const BOB_TOKEN: &str = "bob-token";

pub fn create_test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryFormRepository::new()),
        Arc::new(MemoryTokenRepository::new()),
        SIGNING_SECRET.to_string(),
        format!("{BASE_URL}/"),
        5,
    )
}

/// Test server over in-memory storage with tokens for `alice` and `bob`.
pub async fn create_test_server() -> TestServer {
    let state = create_test_state();

    for (name, owner, token) in [("alice", "alice", ALICE_TOKEN), ("bob", "bob", BOB_TOKEN)] {
        state
            .auth_service
            .issue_token(name, owner, Some(token.to_string()))
            .await
            .unwrap();
    }

    TestServer::new(router_without_rate_limits(state)).unwrap()
}

pub fn feedback_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("email", FieldType::Email, "Email").required(),
        FieldDefinition::new("recommend", FieldType::Radio, "Would you recommend us?")
            .required()
            .with_options(["Yes", "No", "Maybe"]),
        FieldDefinition::new("topics", FieldType::Checkbox, "Topics")
            .with_options(["Tech", "Design", "Business"]),
        FieldDefinition::new("comment", FieldType::LongText, "Comment"),
    ]
}

/// Creates and publishes a feedback form as `alice`; returns the form JSON.
pub async fn create_published_form(server: &TestServer) -> Value {
    let created = server
        .post("/api/forms")
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({
            "title": "Customer Feedback",
            "fields": feedback_fields(),
        }))
        .await;
    created.assert_status(axum::http::StatusCode::CREATED);

    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let published = server
        .post(&format!("/api/forms/{id}/publish"))
        .authorization_bearer(ALICE_TOKEN)
        .await;
    published.assert_status_ok();

    published.json::<Value>()
}

pub async fn submit(server: &TestServer, slug: &str, responses: Value) {
    server
        .post(&format!("/f/{slug}/responses"))
        .json(&json!({ "responses": responses }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);
}
