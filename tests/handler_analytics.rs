mod common;

use common::{ALICE_TOKEN, BOB_TOKEN, create_published_form, create_test_server, submit};
use serde_json::{Value, json};

async fn form_with_responses(server: &axum_test::TestServer) -> (i64, String) {
    let form = create_published_form(server).await;
    let id = form["id"].as_i64().unwrap();
    let slug = form["slug"].as_str().unwrap().to_string();

    submit(
        server,
        &slug,
        json!({"email": "a@example.com", "recommend": "Yes", "topics": ["Tech", "Design"]}),
    )
    .await;
    submit(
        server,
        &slug,
        json!({"email": "b@example.com", "recommend": "Yes", "topics": ["Tech"]}),
    )
    .await;
    submit(
        server,
        &slug,
        json!({"email": "c@example.com", "recommend": "No", "comment": "Slow, but \"fine\""}),
    )
    .await;

    (id, slug)
}

#[tokio::test]
async fn test_report_counts_values() {
    let server = create_test_server().await;
    let (id, _) = form_with_responses(&server).await;

    let response = server
        .get(&format!("/api/forms/{id}/analytics"))
        .add_query_param("range", "week")
        .authorization_bearer(ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["formId"], id);
    assert_eq!(json["range"], "week");
    assert_eq!(json["totalResponses"], 3);
    assert_eq!(json["completeResponses"], 3);
    assert_eq!(json["undatedResponses"], 0);

    let timeline = json["timeline"].as_array().unwrap();
    let counted: u64 = timeline.iter().map(|d| d["count"].as_u64().unwrap()).sum();
    assert_eq!(counted, 3);

    let fields = json["fields"].as_array().unwrap();
    let ids: Vec<&str> = fields.iter().map(|f| f["fieldId"].as_str().unwrap()).collect();
    assert_eq!(ids, ["email", "recommend", "topics", "comment"]);

    let recommend = &fields[1];
    assert_eq!(recommend["label"], "Would you recommend us?");
    assert_eq!(recommend["answered"], 3);
    assert_eq!(recommend["topValues"][0], json!({"value": "Yes", "count": 2}));
    assert_eq!(recommend["topValues"][1], json!({"value": "No", "count": 1}));

    let topics = &fields[2];
    assert_eq!(topics["answered"], 2);
    assert_eq!(topics["topValues"][0], json!({"value": "Tech", "count": 2}));
}

#[tokio::test]
async fn test_report_top_parameter() {
    let server = create_test_server().await;
    let (id, _) = form_with_responses(&server).await;

    let json = server
        .get(&format!("/api/forms/{id}/analytics"))
        .add_query_param("top", 1)
        .authorization_bearer(ALICE_TOKEN)
        .await
        .json::<Value>();

    assert_eq!(json["range"], "all");
    assert_eq!(json["fields"][1]["topValues"].as_array().unwrap().len(), 1);

    server
        .get(&format!("/api/forms/{id}/analytics"))
        .add_query_param("top", 0)
        .authorization_bearer(ALICE_TOKEN)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_raw_aggregate() {
    let server = create_test_server().await;
    let (id, _) = form_with_responses(&server).await;

    let response = server
        .get(&format!("/api/forms/{id}/analytics/raw"))
        .authorization_bearer(ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    let result = &response.json::<Value>()["result"];
    assert_eq!(result["totalResponses"], 3);
    assert_eq!(result["fieldAnalytics"]["recommend"]["total"], 3);
}

#[tokio::test]
async fn test_analytics_of_empty_form() {
    let server = create_test_server().await;
    let form = create_published_form(&server).await;
    let id = form["id"].as_i64().unwrap();

    let json = server
        .get(&format!("/api/forms/{id}/analytics"))
        .authorization_bearer(ALICE_TOKEN)
        .await
        .json::<Value>();

    assert_eq!(json["totalResponses"], 0);
    assert!(json["timeline"].as_array().unwrap().is_empty());
    assert_eq!(json["fields"][0]["answered"], 0);
}

#[tokio::test]
async fn test_export_csv() {
    let server = create_test_server().await;
    let (id, _) = form_with_responses(&server).await;

    let response = server
        .get(&format!("/api/forms/{id}/export.csv"))
        .authorization_bearer(ALICE_TOKEN)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
    assert_eq!(
        response.header("content-disposition"),
        format!("attachment; filename=\"form-responses-{id}.csv\"").as_str()
    );

    let body = response.text();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("id,submittedAt,"));
    assert!(body.contains("\"Slow, but \"\"fine\"\"\""));
    assert!(body.contains("Tech; Design"));
}

#[tokio::test]
async fn test_analytics_scoped_to_owner() {
    let server = create_test_server().await;
    let (id, _) = form_with_responses(&server).await;

    server
        .get(&format!("/api/forms/{id}/analytics"))
        .authorization_bearer(BOB_TOKEN)
        .await
        .assert_status_not_found();

    server
        .get(&format!("/api/forms/{id}/export.csv"))
        .authorization_bearer(BOB_TOKEN)
        .await
        .assert_status_not_found();
}
