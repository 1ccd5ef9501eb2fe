//! Request and response types for the DataForSEO client.
//!
//! # Design
//! Caller input is a tagged union (`QueryInput`) so the "all entries share
//! one shape" rule is enforced by the type system instead of runtime checks.
//! Per-endpoint request structs implement `Default` with the remote API's
//! documented defaults, so callers only spell out what differs. Response
//! types are defined independently of the mock-server crate; integration
//! tests catch schema drift.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default location code used when the caller does not supply one
/// (2840 = United States).
pub const DEFAULT_LOCATION_CODE: u32 = 2840;

/// Caller-supplied identifiers for one call: a single keyword or site, a
/// list of them, or a list of (identifier, location code) pairs when
/// entries target different locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    One(String),
    Many(Vec<String>),
    Located(Vec<(String, u32)>),
}

impl QueryInput {
    /// True when the input carries no identifiers at all. An empty single
    /// identifier counts as absent, mirroring the remote API's treatment of
    /// blank keywords.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryInput::One(s) => s.is_empty(),
            QueryInput::Many(items) => items.is_empty(),
            QueryInput::Located(pairs) => pairs.is_empty(),
        }
    }
}

impl Default for QueryInput {
    fn default() -> Self {
        QueryInput::Many(Vec::new())
    }
}

impl From<&str> for QueryInput {
    fn from(s: &str) -> Self {
        QueryInput::One(s.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(s: String) -> Self {
        QueryInput::One(s)
    }
}

impl From<Vec<String>> for QueryInput {
    fn from(items: Vec<String>) -> Self {
        QueryInput::Many(items)
    }
}

impl From<Vec<&str>> for QueryInput {
    fn from(items: Vec<&str>) -> Self {
        QueryInput::Many(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(String, u32)>> for QueryInput {
    fn from(pairs: Vec<(String, u32)>) -> Self {
        QueryInput::Located(pairs)
    }
}

/// Execution mode for one call, resolved from the caller's `live` flag and
/// optional task id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Synchronous: POST to the live path, full envelope back.
    Live,
    /// Asynchronous submission: POST to the task_post path, condensed task
    /// records back.
    TaskCreate,
    /// Asynchronous retrieval: GET the task_get path for a previously
    /// submitted task id.
    TaskRetrieve,
}

impl Mode {
    /// A supplied task id always selects retrieval; otherwise `live` picks
    /// between the synchronous path and task creation.
    pub fn resolve(live: bool, task_id: Option<&str>) -> Self {
        if task_id.is_some() {
            Mode::TaskRetrieve
        } else if live {
            Mode::Live
        } else {
            Mode::TaskCreate
        }
    }
}

/// Parameters for a Google organic SERP call.
#[derive(Debug, Clone)]
pub struct SerpRequest {
    pub keywords: QueryInput,
    /// Used for every keyword unless the input carries per-keyword pairs.
    pub location_code: u32,
    pub live: bool,
    /// Retrieve a previously created task instead of submitting keywords.
    pub task_id: Option<String>,
    /// Additional payload fields; override the endpoint defaults on key
    /// collision.
    pub extra: Map<String, Value>,
}

impl Default for SerpRequest {
    fn default() -> Self {
        Self {
            keywords: QueryInput::default(),
            location_code: DEFAULT_LOCATION_CODE,
            live: true,
            task_id: None,
            extra: Map::new(),
        }
    }
}

/// Parameters for a Google Ads search-volume call.
#[derive(Debug, Clone)]
pub struct SearchVolumeRequest {
    pub keywords: QueryInput,
    pub location_code: u32,
    /// Start of the reporting window, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// End of the reporting window, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    pub live: bool,
    pub task_id: Option<String>,
    pub extra: Map<String, Value>,
}

impl Default for SearchVolumeRequest {
    fn default() -> Self {
        Self {
            keywords: QueryInput::default(),
            location_code: DEFAULT_LOCATION_CODE,
            date_from: None,
            date_to: None,
            live: true,
            task_id: None,
            extra: Map::new(),
        }
    }
}

/// Parameters for a Google Ads keywords-for-site call.
#[derive(Debug, Clone)]
pub struct KeywordsForSiteRequest {
    /// Sites or domains to look up. Per-target location pairs are not
    /// supported by this endpoint.
    pub targets: QueryInput,
    pub location_code: u32,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub live: bool,
    pub task_id: Option<String>,
    pub extra: Map<String, Value>,
}

impl Default for KeywordsForSiteRequest {
    fn default() -> Self {
        Self {
            targets: QueryInput::default(),
            location_code: DEFAULT_LOCATION_CODE,
            date_from: None,
            date_to: None,
            live: true,
            task_id: None,
            extra: Map::new(),
        }
    }
}

/// Parameters for the live-only backlink endpoints (domain pages and
/// domain pages summary).
#[derive(Debug, Clone, Default)]
pub struct BacklinksRequest {
    /// Domains or pages to inspect. Per-target location pairs are not
    /// supported by these endpoints.
    pub targets: QueryInput,
    pub extra: Map<String, Value>,
}

/// Condensed record for one task accepted by a task_post call. The caller
/// stores the `task_id` and presents it later for retrieval; the core never
/// persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    /// The identifier(s) echoed back in the task's `data` object: `keyword`
    /// for SERP, `keywords` for search volume, `target` for site lookups.
    pub query: Value,
    pub location_code: Option<u32>,
}

/// Normalized outcome of one call, tagged by the mode it was issued in.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Live mode: the full decoded envelope, unmodified. Callers read
    /// `tasks[i].result` themselves.
    Envelope(Value),
    /// Task creation: one record per accepted task, in the order the remote
    /// returned them (not necessarily submission order).
    TasksCreated(Vec<TaskRecord>),
    /// Task retrieval: the sole task's `result` payload, or `None` when the
    /// envelope carries no tasks collection.
    TaskResult(Option<Value>),
}

/// Minimal typed view of the response envelope, used by the task-mode
/// normalizers. Live mode passes the raw `Value` through instead, and the
/// error check reads the raw value to avoid cloning large envelopes.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub tasks: Option<Vec<TaskEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub result: Option<Value>,
}
