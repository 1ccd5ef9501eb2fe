use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- live ---

#[tokio::test]
async fn serp_live_returns_envelope_with_result() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v3/serp/google/organic/live/advanced",
            r#"[{"keyword":"widget","location_code":2840}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env = body_json(resp).await;
    assert_eq!(env["tasks_error"], 0);
    assert_eq!(env["tasks_count"], 1);
    assert_eq!(env["tasks"][0]["status_code"], 20000);
    assert_eq!(env["tasks"][0]["data"]["keyword"], "widget");
    assert_eq!(env["tasks"][0]["result"][0]["keyword"], "widget");
}

#[tokio::test]
async fn serp_live_missing_keyword_reports_task_error() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v3/serp/google/organic/live/advanced",
            r#"[{"location_code":2840}]"#,
        ))
        .await
        .unwrap();

    let env = body_json(resp).await;
    assert_eq!(env["tasks_error"], 1);
    assert_eq!(env["tasks"][0]["status_code"], 40501);
    assert_eq!(env["tasks"][0]["status_message"], "Invalid Field: 'keyword'.");
}

#[tokio::test]
async fn volume_live_rejects_empty_keywords_array() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/v3/keywords_data/google_ads/search_volume/live",
            r#"[{"keywords":[],"location_code":2840}]"#,
        ))
        .await
        .unwrap();

    let env = body_json(resp).await;
    assert_eq!(env["tasks_error"], 1);
    assert_eq!(env["tasks"][0]["status_message"], "Invalid Field: 'keywords'.");
}

#[tokio::test]
async fn backlink_paths_both_respond() {
    for path in [
        "/v3/backlinks/domain_pages/live",
        "/v3/backlinks/domain_pages_summary/live",
    ] {
        let app = app();
        let resp = app
            .oneshot(json_request("POST", path, r#"[{"target":"example.com"}]"#))
            .await
            .unwrap();

        let env = body_json(resp).await;
        assert_eq!(env["tasks_error"], 0);
        assert_eq!(env["tasks"][0]["data"]["target"], "example.com");
    }
}

// --- task lifecycle ---

#[tokio::test]
async fn task_post_then_task_get_replays_stored_data() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v3/keywords_data/google_ads/search_volume/task_post",
            r#"[{"keywords":["alpha","beta"],"location_code":2826}]"#,
        ))
        .await
        .unwrap();

    let env = body_json(resp).await;
    assert_eq!(env["tasks_error"], 0);
    let task_id = env["tasks"][0]["id"].as_str().unwrap().to_string();
    assert!(env["tasks"][0]["result"].is_null());

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/v3/keywords_data/google_ads/search_volume/task_get/{task_id}"
                ))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let env = body_json(resp).await;
    assert_eq!(env["tasks_error"], 0);
    assert_eq!(env["tasks"][0]["id"], task_id.as_str());
    assert_eq!(env["tasks"][0]["data"]["location_code"], 2826);
    assert_eq!(env["tasks"][0]["result"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn task_get_unknown_id_reports_not_found() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v3/serp/google/organic/task_get/advanced/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let env = body_json(resp).await;
    assert_eq!(env["tasks_error"], 1);
    assert_eq!(env["tasks"][0]["status_code"], 40401);
    assert_eq!(env["tasks"][0]["status_message"], "Task Not Found.");
}
