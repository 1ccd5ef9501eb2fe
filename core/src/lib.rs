//! Synchronous API client core for the DataForSEO v3 service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `DataForSeoClient` is stateless — it holds only the base URL, the
//!   precomputed Basic-auth header, and the cost-tracking flag.
//! - Task-capable endpoints are split into `build_*` (produces a prepared
//!   request with its resolved execution mode) and `parse_*` (consumes the
//!   response for that mode), so the I/O boundary is explicit. The backlink
//!   endpoints are live-only and skip mode handling.
//! - Caller input is the tagged `QueryInput` union; payload groups are
//!   `serde_json::Map` values so arbitrary caller extras can override the
//!   endpoint defaults.
//! - The keyword denylist is data, not control flow — see `sanitize`.

pub mod client;
pub mod error;
pub mod http;
pub mod sanitize;
pub mod types;

mod normalize;
mod payload;

pub use client::{DataForSeoClient, PreparedRequest};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    ApiResponse, BacklinksRequest, KeywordsForSiteRequest, Mode, QueryInput, SearchVolumeRequest,
    SerpRequest, TaskRecord, DEFAULT_LOCATION_CODE,
};
