//! Full live/task lifecycle tests against the mock DataForSEO server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every core client
//! operation over real HTTP using ureq. Validates that request building and
//! response normalization work end-to-end with the actual server.

use dataforseo_core::{
    ApiError, ApiResponse, BacklinksRequest, DataForSeoClient, HttpMethod, HttpRequest,
    HttpResponse, KeywordsForSiteRequest, SearchVolumeRequest, SerpRequest,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so non-2xx
/// responses come back as data; the core treats transport status as the
/// caller's concern and only looks at the body.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => {
            let mut call = agent.get(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            call.call()
        }
        (HttpMethod::Post, body) => {
            let mut call = agent.post(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name, value);
            }
            call.send(body.unwrap_or_default().as_bytes())
        }
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Start the mock server on a random port and return a client pointed at it.
fn start_client() -> DataForSeoClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    DataForSeoClient::new("login:password", false)
        .with_cost_tracking()
        .with_base_url(&format!("http://{addr}/v3"))
}

#[test]
fn serp_live_round_trip() {
    let client = start_client();

    let prepared = client
        .build_serp(&SerpRequest {
            keywords: "widget".into(),
            ..Default::default()
        })
        .unwrap();
    let parsed = client.parse_serp(prepared.mode, execute(prepared.request)).unwrap();

    match parsed {
        ApiResponse::Envelope(envelope) => {
            assert_eq!(envelope["tasks_error"], 0);
            assert_eq!(envelope["tasks"][0]["data"]["keyword"], "widget");
            assert_eq!(envelope["tasks"][0]["data"]["depth"], 100);
            assert_eq!(envelope["tasks"][0]["result"][0]["keyword"], "widget");
        }
        other => panic!("expected Envelope, got {other:?}"),
    }
}

#[test]
fn search_volume_task_lifecycle() {
    let client = start_client();

    // Step 1: submit a task; the sanitizer drops "a!" on the way out.
    let prepared = client
        .build_search_volume(&SearchVolumeRequest {
            keywords: vec!["a!", "clean"].into(),
            location_code: 2826,
            live: false,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(prepared.dropped_keywords, 1);

    let parsed = client
        .parse_search_volume(prepared.mode, execute(prepared.request))
        .unwrap();
    let records = match parsed {
        ApiResponse::TasksCreated(records) => records,
        other => panic!("expected TasksCreated, got {other:?}"),
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].query, serde_json::json!(["clean"]));
    assert_eq!(records[0].location_code, Some(2826));

    // Step 2: retrieve the task by id.
    let prepared = client
        .build_search_volume(&SearchVolumeRequest {
            task_id: Some(records[0].task_id.clone()),
            ..Default::default()
        })
        .unwrap();
    let parsed = client
        .parse_search_volume(prepared.mode, execute(prepared.request))
        .unwrap();

    match parsed {
        ApiResponse::TaskResult(Some(result)) => {
            let rows = result.as_array().unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0]["keyword"], "clean");
        }
        other => panic!("expected TaskResult, got {other:?}"),
    }
}

#[test]
fn fully_sanitized_group_is_rejected_remotely() {
    let client = start_client();

    // Both keywords are dropped, the empty group still goes out, and the
    // remote rejects it — surfaced as a task error, not a silent skip.
    let prepared = client
        .build_search_volume(&SearchVolumeRequest {
            keywords: vec!["a!", "b?"].into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(prepared.dropped_keywords, 2);

    let err = client
        .parse_search_volume(prepared.mode, execute(prepared.request))
        .unwrap_err();
    match err {
        ApiError::RemoteTask { status_code, message } => {
            assert_eq!(status_code, 40501);
            assert_eq!(message, "Invalid Field: 'keywords'.");
        }
        other => panic!("expected RemoteTask, got {other:?}"),
    }
}

#[test]
fn unknown_task_id_surfaces_remote_error() {
    let client = start_client();

    let prepared = client
        .build_serp(&SerpRequest {
            task_id: Some("00000000-0000-0000-0000-000000000000".to_string()),
            ..Default::default()
        })
        .unwrap();
    let err = client.parse_serp(prepared.mode, execute(prepared.request)).unwrap_err();

    match err {
        ApiError::RemoteTask { status_code, message } => {
            assert_eq!(status_code, 40401);
            assert_eq!(message, "Task Not Found.");
        }
        other => panic!("expected RemoteTask, got {other:?}"),
    }
}

#[test]
fn keywords_for_site_live_round_trip() {
    let client = start_client();

    let prepared = client
        .build_keywords_for_site(&KeywordsForSiteRequest {
            targets: "example.com".into(),
            ..Default::default()
        })
        .unwrap();
    let parsed = client
        .parse_keywords_for_site(prepared.mode, execute(prepared.request))
        .unwrap();

    match parsed {
        ApiResponse::Envelope(envelope) => {
            assert_eq!(envelope["tasks_error"], 0);
            assert_eq!(envelope["tasks"][0]["data"]["target"], "example.com");
        }
        other => panic!("expected Envelope, got {other:?}"),
    }
}

#[test]
fn backlink_endpoints_round_trip() {
    let client = start_client();

    let req = client
        .build_domain_pages(&BacklinksRequest {
            targets: "example.com".into(),
            ..Default::default()
        })
        .unwrap();
    let envelope = client.parse_backlinks(execute(req)).unwrap();
    assert_eq!(envelope["tasks_error"], 0);
    assert_eq!(envelope["tasks"][0]["result"][0]["target"], "example.com");

    let req = client
        .build_domain_pages_summary(&BacklinksRequest {
            targets: vec!["example.com", "example.org"].into(),
            ..Default::default()
        })
        .unwrap();
    let envelope = client.parse_backlinks(execute(req)).unwrap();
    assert_eq!(envelope["tasks_count"], 2);
}
