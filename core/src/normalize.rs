//! Response normalization: envelope decoding, task-error surfacing, and
//! per-mode reshaping.
//!
//! # Design
//! The error check reads the raw `Value` so the live passthrough never pays
//! for a clone of a large envelope; the task modes deserialize the minimal
//! typed view afterwards. The cost diagnostic lives in its own failure
//! boundary: every lookup is `Option`-chained, so a missing or malformed
//! `cost` field can only shrink or suppress the reported sum, never disturb
//! the primary result.

use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::types::{Envelope, TaskRecord};

/// Decode a response body. An undecodable body is the only transport
/// symptom the core interprets; everything else is the caller's transport
/// concern.
pub(crate) fn decode(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Fail with the first task's status when the envelope reports any failed
/// task. Partial results are never processed.
pub(crate) fn ensure_no_task_errors(envelope: &Value) -> Result<(), ApiError> {
    let errors = envelope.get("tasks_error").and_then(Value::as_u64).unwrap_or(0);
    if errors == 0 {
        return Ok(());
    }

    let first = envelope.get("tasks").and_then(Value::as_array).and_then(|tasks| tasks.first());
    let status_code = first
        .and_then(|task| task.get("status_code"))
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;
    let message = first
        .and_then(|task| task.get("status_message"))
        .and_then(Value::as_str)
        .unwrap_or("task failed without a status message")
        .to_string();

    Err(ApiError::RemoteTask { status_code, message })
}

/// Condense a task_post envelope into one record per task, in the order the
/// remote returned them. `echo_field` names the `data` field that echoes
/// the submitted query (`keyword`, `keywords`, or `target`).
pub(crate) fn task_records(envelope: Value, echo_field: &str) -> Result<Vec<TaskRecord>, ApiError> {
    let envelope: Envelope =
        serde_json::from_value(envelope).map_err(|e| ApiError::DeserializationError(e.to_string()))?;

    let records = envelope
        .tasks
        .unwrap_or_default()
        .into_iter()
        .map(|task| TaskRecord {
            task_id: task.id,
            query: task.data.get(echo_field).cloned().unwrap_or(Value::Null),
            location_code: task
                .data
                .get("location_code")
                .and_then(Value::as_u64)
                .map(|code| code as u32),
        })
        .collect();

    Ok(records)
}

/// Extract the sole task's `result` from a task_get envelope, or `None`
/// when the envelope carries no tasks collection.
pub(crate) fn task_result(envelope: Value) -> Result<Option<Value>, ApiError> {
    let envelope: Envelope =
        serde_json::from_value(envelope).map_err(|e| ApiError::DeserializationError(e.to_string()))?;

    Ok(envelope
        .tasks
        .and_then(|tasks| tasks.into_iter().next())
        .and_then(|task| task.result))
}

/// Sum the reported `cost` of each task. `None` when the envelope has no
/// tasks array; entries with a missing or non-numeric cost are skipped.
pub(crate) fn cost_sum(envelope: &Value) -> Option<f64> {
    let tasks = envelope.get("tasks")?.as_array()?;
    let mut total = 0.0;
    for task in tasks {
        if let Some(cost) = task.get("cost").and_then(Value::as_f64) {
            total += cost;
        }
    }
    Some(total)
}

/// Best-effort cost diagnostic. Failures here must never reach the caller,
/// so the computation only logs.
pub(crate) fn report_cost(envelope: &Value) {
    if let Some(total) = cost_sum(envelope) {
        debug!(cost = total, "envelope cost");
    }
}
