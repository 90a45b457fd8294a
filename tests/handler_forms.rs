mod common;

use axum::http::StatusCode;
use common::{ALICE_TOKEN, BOB_TOKEN, create_published_form, create_test_server, feedback_fields};
use serde_json::{Value, json};

#[tokio::test]
async fn test_requires_bearer_token() {
    let server = create_test_server().await;

    let response = server.get("/api/forms").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_rejects_unknown_token() {
    let server = create_test_server().await;

    let response = server
        .get("/api/forms")
        .authorization_bearer("not-a-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_form_returns_share_url() {
    let server = create_test_server().await;

    let response = server
        .post("/api/forms")
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({
            "title": "Customer Feedback",
            "description": "Tell us what you think",
            "fields": feedback_fields(),
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    let slug = json["slug"].as_str().unwrap();
    assert_eq!(slug.len(), 12);
    assert_eq!(
        json["shareUrl"],
        format!("https://forms.example.com/f/{slug}")
    );
    assert_eq!(json["published"], false);
    assert_eq!(json["responsesCount"], 0);
    assert_eq!(json["fields"].as_array().unwrap().len(), 4);
    assert_eq!(json["fields"][1]["type"], "radio");
}

#[tokio::test]
async fn test_create_form_reports_field_errors() {
    let server = create_test_server().await;

    let response = server
        .post("/api/forms")
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({
            "title": "   ",
            "fields": [
                {"id": "choice", "type": "radio", "label": "Pick one"},
                {"id": "choice", "type": "short_text", "label": "Again"}
            ],
        }))
        .await;

    response.assert_status_bad_request();

    let fields = &response.json::<Value>()["error"]["details"]["fields"];
    assert!(fields["title"].is_string());
    assert!(fields["fields[0].options"].is_string());
    assert!(fields["fields[1].id"].is_string());
}

#[tokio::test]
async fn test_forms_are_scoped_to_owner() {
    let server = create_test_server().await;
    let form = create_published_form(&server).await;
    let id = form["id"].as_i64().unwrap();

    let alice = server
        .get("/api/forms")
        .authorization_bearer(ALICE_TOKEN)
        .await
        .json::<Value>();
    assert_eq!(alice["items"].as_array().unwrap().len(), 1);

    let bob = server
        .get("/api/forms")
        .authorization_bearer(BOB_TOKEN)
        .await
        .json::<Value>();
    assert!(bob["items"].as_array().unwrap().is_empty());

    server
        .get(&format!("/api/forms/{id}"))
        .authorization_bearer(BOB_TOKEN)
        .await
        .assert_status_not_found();

    server
        .delete(&format!("/api/forms/{id}"))
        .authorization_bearer(BOB_TOKEN)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_update_form_keeps_slug() {
    let server = create_test_server().await;
    let form = create_published_form(&server).await;
    let id = form["id"].as_i64().unwrap();

    let response = server
        .put(&format!("/api/forms/{id}"))
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({
            "title": "Renamed",
            "fields": [{"id": "email", "type": "email", "label": "Email", "required": true}],
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["title"], "Renamed");
    assert_eq!(json["slug"], form["slug"]);
    assert_eq!(json["published"], true);
    assert_eq!(json["fields"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_published_form_cannot_drop_all_fields() {
    let server = create_test_server().await;
    let form = create_published_form(&server).await;
    let id = form["id"].as_i64().unwrap();

    server
        .put(&format!("/api/forms/{id}"))
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({"title": "Empty", "fields": []}))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_publish_requires_fields() {
    let server = create_test_server().await;

    let created = server
        .post("/api/forms")
        .authorization_bearer(ALICE_TOKEN)
        .json(&json!({"title": "Draft"}))
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    server
        .post(&format!("/api/forms/{id}/publish"))
        .authorization_bearer(ALICE_TOKEN)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_unpublish_hides_public_form() {
    let server = create_test_server().await;
    let form = create_published_form(&server).await;
    let id = form["id"].as_i64().unwrap();
    let slug = form["slug"].as_str().unwrap();

    server.get(&format!("/f/{slug}")).await.assert_status_ok();

    let response = server
        .post(&format!("/api/forms/{id}/unpublish"))
        .authorization_bearer(ALICE_TOKEN)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["published"], false);

    server
        .get(&format!("/f/{slug}"))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_form() {
    let server = create_test_server().await;
    let form = create_published_form(&server).await;
    let id = form["id"].as_i64().unwrap();

    server
        .delete(&format!("/api/forms/{id}"))
        .authorization_bearer(ALICE_TOKEN)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/forms/{id}"))
        .authorization_bearer(ALICE_TOKEN)
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_template_gallery_and_instantiation() {
    let server = create_test_server().await;

    let gallery = server
        .get("/api/templates")
        .authorization_bearer(ALICE_TOKEN)
        .await
        .json::<Value>();
    assert_eq!(gallery["categories"].as_array().unwrap().len(), 8);
    assert_eq!(gallery["items"].as_array().unwrap().len(), 8);

    let response = server
        .post("/api/forms/from-template/contact-form")
        .add_query_param("title", "Get in touch")
        .authorization_bearer(ALICE_TOKEN)
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();
    assert_eq!(json["title"], "Get in touch");
    assert!(!json["fields"].as_array().unwrap().is_empty());

    server
        .post("/api/forms/from-template/no-such-template")
        .authorization_bearer(ALICE_TOKEN)
        .await
        .assert_status_not_found();
}
