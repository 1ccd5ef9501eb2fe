//! In-memory emulation of the DataForSEO v3 endpoints used by the client
//! core: live calls return fabricated envelopes immediately, task_post
//! stores the submitted payload and mints a task id, task_get replays the
//! stored payload with a fabricated result. Envelope shapes follow the
//! remote API: a top-level `tasks_error` count plus one entry per submitted
//! payload element, each carrying `status_code`, `status_message`, `cost`,
//! the echoed `data`, and (when available) a `result` array.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Stored task_post payloads, keyed by minted task id.
pub type Db = Arc<RwLock<HashMap<Uuid, Value>>>;

/// Status returned for a payload element that fails validation.
type TaskFailure = (u64, String);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/v3/serp/google/organic/live/advanced", post(serp_live))
        .route("/v3/serp/google/organic/task_post", post(serp_task_post))
        .route("/v3/serp/google/organic/task_get/advanced/{id}", get(task_get))
        .route("/v3/keywords_data/google_ads/search_volume/live", post(volume_live))
        .route("/v3/keywords_data/google_ads/search_volume/task_post", post(volume_task_post))
        .route("/v3/keywords_data/google_ads/search_volume/task_get/{id}", get(task_get))
        .route("/v3/keywords_data/google_ads/keywords_for_site/live", post(site_live))
        .route("/v3/keywords_data/google_ads/keywords_for_site/task_post", post(site_task_post))
        .route("/v3/keywords_data/google_ads/keywords_for_site/task_get/{id}", get(task_get))
        .route("/v3/backlinks/domain_pages/live", post(backlinks_live))
        .route("/v3/backlinks/domain_pages_summary/live", post(backlinks_live))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- handlers ---

async fn serp_live(Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(live_envelope(&payload, check_serp))
}

async fn serp_task_post(State(db): State<Db>, Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(task_post_envelope(&db, &payload, check_serp).await)
}

async fn volume_live(Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(live_envelope(&payload, check_volume))
}

async fn volume_task_post(State(db): State<Db>, Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(task_post_envelope(&db, &payload, check_volume).await)
}

async fn site_live(Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(live_envelope(&payload, check_target))
}

async fn site_task_post(State(db): State<Db>, Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(task_post_envelope(&db, &payload, check_target).await)
}

async fn backlinks_live(Json(payload): Json<Vec<Value>>) -> Json<Value> {
    Json(live_envelope(&payload, check_target))
}

async fn task_get(State(db): State<Db>, Path(id): Path<String>) -> Json<Value> {
    let stored = match id.parse::<Uuid>() {
        Ok(uuid) => db.read().await.get(&uuid).cloned(),
        Err(_) => None,
    };

    match stored {
        Some(data) => {
            let result = fabricate_result(&data);
            Json(envelope(vec![ok_task(&id, &data, Some(result))], 0))
        }
        None => Json(envelope(
            vec![json!({
                "id": id,
                "status_code": 40401,
                "status_message": "Task Not Found.",
                "cost": 0,
                "data": null,
                "result": null
            })],
            1,
        )),
    }
}

// --- envelope fabrication ---

fn live_envelope(payload: &[Value], check: fn(&Value) -> Result<(), TaskFailure>) -> Value {
    let mut errors = 0;
    let tasks = payload
        .iter()
        .map(|data| match check(data) {
            Ok(()) => {
                let id = Uuid::new_v4().to_string();
                let result = fabricate_result(data);
                ok_task(&id, data, Some(result))
            }
            Err((code, message)) => {
                errors += 1;
                failed_task(data, code, &message)
            }
        })
        .collect();
    envelope(tasks, errors)
}

async fn task_post_envelope(
    db: &Db,
    payload: &[Value],
    check: fn(&Value) -> Result<(), TaskFailure>,
) -> Value {
    let mut errors = 0;
    let mut tasks = Vec::with_capacity(payload.len());
    for data in payload {
        match check(data) {
            Ok(()) => {
                let id = Uuid::new_v4();
                db.write().await.insert(id, data.clone());
                tasks.push(ok_task(&id.to_string(), data, None));
            }
            Err((code, message)) => {
                errors += 1;
                tasks.push(failed_task(data, code, &message));
            }
        }
    }
    envelope(tasks, errors)
}

fn envelope(tasks: Vec<Value>, tasks_error: u64) -> Value {
    json!({
        "version": "0.1.20240801",
        "status_code": 20000,
        "status_message": "Ok.",
        "tasks_count": tasks.len(),
        "tasks_error": tasks_error,
        "tasks": tasks
    })
}

fn ok_task(id: &str, data: &Value, result: Option<Value>) -> Value {
    json!({
        "id": id,
        "status_code": 20000,
        "status_message": "Ok.",
        "cost": 0.0125,
        "data": data,
        "result": result
    })
}

fn failed_task(data: &Value, status_code: u64, status_message: &str) -> Value {
    json!({
        "id": Uuid::new_v4().to_string(),
        "status_code": status_code,
        "status_message": status_message,
        "cost": 0,
        "data": data,
        "result": null
    })
}

/// Build a plausible result array from the echoed payload fields: SERP
/// items for a `keyword`, volume rows for a `keywords` array, page metrics
/// for a `target`.
fn fabricate_result(data: &Value) -> Value {
    if let Some(keyword) = data.get("keyword") {
        return json!([{
            "keyword": keyword,
            "se_domain": "google.com",
            "items": [{"type": "organic", "rank_absolute": 1, "domain": "example.com"}]
        }]);
    }
    if let Some(keywords) = data.get("keywords").and_then(Value::as_array) {
        let rows: Vec<Value> = keywords
            .iter()
            .map(|kw| json!({"keyword": kw, "search_volume": 1000, "competition": 0.42}))
            .collect();
        return Value::Array(rows);
    }
    if let Some(target) = data.get("target") {
        return json!([{
            "target": target,
            "items_count": 1,
            "items": [{"page": "/", "backlinks": 12}]
        }]);
    }
    json!([])
}

// --- validation ---

fn check_serp(data: &Value) -> Result<(), TaskFailure> {
    match data.get("keyword").and_then(Value::as_str) {
        Some(kw) if !kw.is_empty() => Ok(()),
        _ => Err((40501, "Invalid Field: 'keyword'.".to_string())),
    }
}

fn check_volume(data: &Value) -> Result<(), TaskFailure> {
    match data.get("keywords").and_then(Value::as_array) {
        Some(keywords) if !keywords.is_empty() => Ok(()),
        _ => Err((40501, "Invalid Field: 'keywords'.".to_string())),
    }
}

fn check_target(data: &Value) -> Result<(), TaskFailure> {
    match data.get("target").and_then(Value::as_str) {
        Some(target) if !target.is_empty() => Ok(()),
        _ => Err((40501, "Invalid Field: 'target'.".to_string())),
    }
}
