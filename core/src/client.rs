//! Stateless request builder and response normalizer for the DataForSEO v3
//! API.
//!
//! # Design
//! `DataForSeoClient` holds only the base URL, the precomputed Basic-auth
//! header, and the cost-tracking flag — no mutable state between calls.
//! Each endpoint is split into a `build_*` method that produces a prepared
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Task-capable endpoints resolve an execution [`Mode`] at build time; the
//! caller hands the same mode back to `parse_*` so the normalizer knows
//! which shape to produce. The backlink endpoints are live-only and skip
//! mode handling entirely.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::normalize;
use crate::payload;
use crate::types::{
    ApiResponse, BacklinksRequest, KeywordsForSiteRequest, Mode, QueryInput, SearchVolumeRequest,
    SerpRequest,
};

const PRODUCTION_URL: &str = "https://api.dataforseo.com/v3";
const SANDBOX_URL: &str = "https://sandbox.dataforseo.com/v3";

/// Static per-endpoint metadata: the base path segment, the result-shape
/// segment some endpoints insert into their live and task_get paths, and
/// the `data` field that echoes the submitted query in task envelopes.
struct Endpoint {
    base: &'static str,
    shape: Option<&'static str>,
    echo_field: &'static str,
}

const SERP_GOOGLE_ORGANIC: Endpoint = Endpoint {
    base: "serp/google/organic",
    shape: Some("advanced"),
    echo_field: "keyword",
};

const GOOGLE_ADS_SEARCH_VOLUME: Endpoint = Endpoint {
    base: "keywords_data/google_ads/search_volume",
    shape: None,
    echo_field: "keywords",
};

const GOOGLE_ADS_KEYWORDS_FOR_SITE: Endpoint = Endpoint {
    base: "keywords_data/google_ads/keywords_for_site",
    shape: None,
    echo_field: "target",
};

/// A built request together with the mode it was dispatched under and any
/// builder diagnostics. Hand `mode` back to the matching `parse_*` method
/// after executing `request`.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub mode: Mode,
    pub request: HttpRequest,
    /// Keywords removed by the sanitizer while building a search-volume
    /// payload. Always zero for the other endpoints.
    pub dropped_keywords: usize,
}

/// Synchronous, stateless client for the DataForSEO v3 API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct DataForSeoClient {
    base_url: String,
    auth_header: String,
    track_cost: bool,
}

impl DataForSeoClient {
    /// Create a client for the production or sandbox environment. The
    /// Basic-auth header is computed once here and attached to every
    /// request.
    pub fn new(api_key: &str, sandbox: bool) -> Self {
        let base = if sandbox { SANDBOX_URL } else { PRODUCTION_URL };
        Self {
            base_url: base.to_string(),
            auth_header: format!("Basic {}", STANDARD.encode(api_key)),
            track_cost: false,
        }
    }

    /// Enable the cost diagnostic: `parse_*` methods sum each task's
    /// reported `cost` and log the total. Best-effort only — it never
    /// affects the returned value.
    pub fn with_cost_tracking(mut self) -> Self {
        self.track_cost = true;
        self
    }

    /// Point the client at a custom base URL, e.g. a local mock of the
    /// remote API in tests.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    // -- SERP (Google organic) ----------------------------------------------

    /// Build a Google organic SERP request. One payload element per
    /// keyword, never batched; pair input gives each element its own
    /// location code.
    pub fn build_serp(&self, req: &SerpRequest) -> Result<PreparedRequest, ApiError> {
        if let Some(task_id) = req.task_id.as_deref() {
            return Ok(self.prepared_task_get(&SERP_GOOGLE_ORGANIC, task_id));
        }
        if req.keywords.is_empty() {
            return Err(ApiError::InvalidInput(
                "a keyword or list of keywords is required".to_string(),
            ));
        }

        let groups = serp_payload(req);
        let url = self.submit_url(&SERP_GOOGLE_ORGANIC, req.live);
        Ok(PreparedRequest {
            mode: Mode::resolve(req.live, None),
            request: self.post_request(url, &groups)?,
            dropped_keywords: 0,
        })
    }

    /// Normalize a SERP response for the mode the request was built under.
    pub fn parse_serp(&self, mode: Mode, response: HttpResponse) -> Result<ApiResponse, ApiError> {
        self.normalize_response(&SERP_GOOGLE_ORGANIC, mode, response)
    }

    // -- Search volume (Google Ads) -----------------------------------------

    /// Build a Google Ads search-volume request. Keywords are sanitized
    /// first and batched into one payload element per distinct location
    /// code; the dropped-keyword count travels on the prepared request.
    pub fn build_search_volume(
        &self,
        req: &SearchVolumeRequest,
    ) -> Result<PreparedRequest, ApiError> {
        if let Some(task_id) = req.task_id.as_deref() {
            return Ok(self.prepared_task_get(&GOOGLE_ADS_SEARCH_VOLUME, task_id));
        }
        if req.keywords.is_empty() {
            return Err(ApiError::InvalidInput(
                "a keyword or list of keywords is required".to_string(),
            ));
        }

        let (groups, dropped_keywords) = search_volume_payload(req);
        if dropped_keywords > 0 {
            warn!(dropped = dropped_keywords, "dropped keywords with disallowed characters");
        }
        let url = self.submit_url(&GOOGLE_ADS_SEARCH_VOLUME, req.live);
        Ok(PreparedRequest {
            mode: Mode::resolve(req.live, None),
            request: self.post_request(url, &groups)?,
            dropped_keywords,
        })
    }

    /// Normalize a search-volume response for the mode the request was
    /// built under.
    pub fn parse_search_volume(
        &self,
        mode: Mode,
        response: HttpResponse,
    ) -> Result<ApiResponse, ApiError> {
        self.normalize_response(&GOOGLE_ADS_SEARCH_VOLUME, mode, response)
    }

    // -- Keywords for site (Google Ads) -------------------------------------

    /// Build a Google Ads keywords-for-site request: one payload element
    /// per target site. Raw input — this endpoint does not sanitize.
    pub fn build_keywords_for_site(
        &self,
        req: &KeywordsForSiteRequest,
    ) -> Result<PreparedRequest, ApiError> {
        if let Some(task_id) = req.task_id.as_deref() {
            return Ok(self.prepared_task_get(&GOOGLE_ADS_KEYWORDS_FOR_SITE, task_id));
        }
        if req.targets.is_empty() {
            return Err(ApiError::InvalidInput(
                "a site or list of sites is required".to_string(),
            ));
        }

        let groups = keywords_for_site_payload(req)?;
        let url = self.submit_url(&GOOGLE_ADS_KEYWORDS_FOR_SITE, req.live);
        Ok(PreparedRequest {
            mode: Mode::resolve(req.live, None),
            request: self.post_request(url, &groups)?,
            dropped_keywords: 0,
        })
    }

    /// Normalize a keywords-for-site response for the mode the request was
    /// built under.
    pub fn parse_keywords_for_site(
        &self,
        mode: Mode,
        response: HttpResponse,
    ) -> Result<ApiResponse, ApiError> {
        self.normalize_response(&GOOGLE_ADS_KEYWORDS_FOR_SITE, mode, response)
    }

    // -- Backlinks (live-only) ----------------------------------------------

    /// Build a backlinks domain-pages request. Live-only: no task modes.
    pub fn build_domain_pages(&self, req: &BacklinksRequest) -> Result<HttpRequest, ApiError> {
        self.build_backlinks("domain_pages", req)
    }

    /// Build a backlinks domain-pages-summary request. Live-only.
    pub fn build_domain_pages_summary(
        &self,
        req: &BacklinksRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.build_backlinks("domain_pages_summary", req)
    }

    /// Normalize a backlinks response: the full decoded envelope after the
    /// task-error check. Shared by both backlink endpoints.
    pub fn parse_backlinks(&self, response: HttpResponse) -> Result<Value, ApiError> {
        let envelope = normalize::decode(&response.body)?;
        normalize::ensure_no_task_errors(&envelope)?;
        if self.track_cost {
            normalize::report_cost(&envelope);
        }
        Ok(envelope)
    }

    // -- Shared plumbing ----------------------------------------------------

    fn build_backlinks(&self, path: &str, req: &BacklinksRequest) -> Result<HttpRequest, ApiError> {
        if req.targets.is_empty() {
            return Err(ApiError::InvalidInput(
                "a domain or list of domains is required".to_string(),
            ));
        }
        let targets = plain_targets(&req.targets, "backlink endpoints")?;

        let groups: Vec<Map<String, Value>> = targets
            .into_iter()
            .map(|target| {
                let mut defaults = Map::new();
                defaults.insert("target".to_string(), Value::from(target));
                payload::merge_extra(defaults, &req.extra)
            })
            .collect();

        self.post_request(format!("{}/backlinks/{path}/live", self.base_url), &groups)
    }

    fn normalize_response(
        &self,
        endpoint: &Endpoint,
        mode: Mode,
        response: HttpResponse,
    ) -> Result<ApiResponse, ApiError> {
        let envelope = normalize::decode(&response.body)?;
        normalize::ensure_no_task_errors(&envelope)?;
        if self.track_cost {
            normalize::report_cost(&envelope);
        }

        match mode {
            Mode::Live => Ok(ApiResponse::Envelope(envelope)),
            Mode::TaskCreate => Ok(ApiResponse::TasksCreated(normalize::task_records(
                envelope,
                endpoint.echo_field,
            )?)),
            Mode::TaskRetrieve => Ok(ApiResponse::TaskResult(normalize::task_result(envelope)?)),
        }
    }

    fn prepared_task_get(&self, endpoint: &Endpoint, task_id: &str) -> PreparedRequest {
        let url = match endpoint.shape {
            Some(shape) => format!("{}/{}/task_get/{shape}/{task_id}", self.base_url, endpoint.base),
            None => format!("{}/{}/task_get/{task_id}", self.base_url, endpoint.base),
        };
        PreparedRequest {
            mode: Mode::TaskRetrieve,
            request: HttpRequest {
                method: HttpMethod::Get,
                url,
                headers: self.headers(),
                body: None,
            },
            dropped_keywords: 0,
        }
    }

    fn submit_url(&self, endpoint: &Endpoint, live: bool) -> String {
        if live {
            match endpoint.shape {
                Some(shape) => format!("{}/{}/live/{shape}", self.base_url, endpoint.base),
                None => format!("{}/{}/live", self.base_url, endpoint.base),
            }
        } else {
            format!("{}/{}/task_post", self.base_url, endpoint.base)
        }
    }

    fn post_request(
        &self,
        url: String,
        groups: &[Map<String, Value>],
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(groups).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: self.headers(),
            body: Some(body),
        })
    }

    /// The static header pair attached to every request, session-style.
    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), self.auth_header.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }
}

/// One payload element per keyword; pair input keeps each pair's location
/// code, plain input shares the request's single code.
fn serp_payload(req: &SerpRequest) -> Vec<Map<String, Value>> {
    let entries: Vec<(&str, u32)> = match &req.keywords {
        QueryInput::One(kw) => vec![(kw.as_str(), req.location_code)],
        QueryInput::Many(kws) => kws.iter().map(|kw| (kw.as_str(), req.location_code)).collect(),
        QueryInput::Located(pairs) => {
            pairs.iter().map(|(kw, code)| (kw.as_str(), *code)).collect()
        }
    };

    entries
        .into_iter()
        .map(|(keyword, location_code)| {
            let mut defaults = Map::new();
            defaults.insert("keyword".to_string(), Value::from(keyword));
            defaults.insert("location_code".to_string(), Value::from(location_code));
            defaults.insert("language_code".to_string(), Value::from("en"));
            defaults.insert("device".to_string(), Value::from("desktop"));
            defaults.insert("os".to_string(), Value::from("windows"));
            defaults.insert("depth".to_string(), Value::from(100));
            payload::merge_extra(defaults, &req.extra)
        })
        .collect()
}

/// Sanitize, then batch keywords into one payload element per distinct
/// location code. A location group whose keywords were all dropped is still
/// emitted with an empty `keywords` array, matching the remote-submission
/// behavior this client replaces.
fn search_volume_payload(req: &SearchVolumeRequest) -> (Vec<Map<String, Value>>, usize) {
    let grouped: Vec<(u32, Vec<String>)> = match &req.keywords {
        QueryInput::One(kw) => vec![(req.location_code, vec![kw.clone()])],
        QueryInput::Many(kws) => vec![(req.location_code, kws.clone())],
        QueryInput::Located(pairs) => payload::group_by_location(pairs),
    };

    let mut dropped_total = 0;
    let groups = grouped
        .into_iter()
        .map(|(location_code, keywords)| {
            let (valid, dropped) = payload::retain_valid_keywords(keywords);
            dropped_total += dropped;
            let mut defaults = Map::new();
            defaults.insert("keywords".to_string(), Value::from(valid));
            defaults.insert("location_code".to_string(), Value::from(location_code));
            defaults.insert("language_code".to_string(), Value::from("en"));
            defaults.insert("date_from".to_string(), optional_date(&req.date_from));
            defaults.insert("date_to".to_string(), optional_date(&req.date_to));
            payload::merge_extra(defaults, &req.extra)
        })
        .collect();

    (groups, dropped_total)
}

fn keywords_for_site_payload(
    req: &KeywordsForSiteRequest,
) -> Result<Vec<Map<String, Value>>, ApiError> {
    let targets = plain_targets(&req.targets, "keywords_for_site")?;

    Ok(targets
        .into_iter()
        .map(|target| {
            let mut defaults = Map::new();
            defaults.insert("target".to_string(), Value::from(target));
            defaults.insert("location_code".to_string(), Value::from(req.location_code));
            defaults.insert("date_from".to_string(), optional_date(&req.date_from));
            defaults.insert("date_to".to_string(), optional_date(&req.date_to));
            payload::merge_extra(defaults, &req.extra)
        })
        .collect())
}

/// Targets for endpoints that take sites or domains only — per-target
/// location pairs are not part of their remote contract.
fn plain_targets<'a>(input: &'a QueryInput, endpoint: &str) -> Result<Vec<&'a str>, ApiError> {
    match input {
        QueryInput::One(target) => Ok(vec![target.as_str()]),
        QueryInput::Many(targets) => Ok(targets.iter().map(String::as_str).collect()),
        QueryInput::Located(_) => Err(ApiError::InvalidInput(format!(
            "{endpoint} does not accept per-target location codes"
        ))),
    }
}

/// The remote API expects unset dates serialized as explicit nulls.
fn optional_date(date: &Option<String>) -> Value {
    date.as_deref().map_or(Value::Null, Value::from)
}
