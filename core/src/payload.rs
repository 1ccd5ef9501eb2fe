//! Payload-shaping helpers shared by the per-endpoint builders.
//!
//! # Design
//! Payload groups are `serde_json::Map` values so arbitrary caller extras
//! can override endpoint defaults with last-writer-wins semantics, the same
//! merge the remote API documents for its request arrays. Grouping of
//! located input is order-preserving: groups appear in first-seen order of
//! their location code and identifiers keep input order within a group, so
//! the same input always produces the same request bytes.

use serde_json::{Map, Value};

use crate::sanitize;

/// Overlay caller-supplied fields onto endpoint defaults. Caller keys win
/// on collision.
pub(crate) fn merge_extra(mut defaults: Map<String, Value>, extra: &Map<String, Value>) -> Map<String, Value> {
    for (key, value) in extra {
        defaults.insert(key.clone(), value.clone());
    }
    defaults
}

/// Group (identifier, location code) pairs by location code.
///
/// Linear scan rather than a hash map keeps the output deterministic:
/// first-seen order of codes, input order within each group.
pub(crate) fn group_by_location(pairs: &[(String, u32)]) -> Vec<(u32, Vec<String>)> {
    let mut groups: Vec<(u32, Vec<String>)> = Vec::new();
    for (ident, code) in pairs {
        match groups.iter_mut().find(|(c, _)| c == code) {
            Some((_, idents)) => idents.push(ident.clone()),
            None => groups.push((*code, vec![ident.clone()])),
        }
    }
    groups
}

/// Drop keywords the sanitizer rejects, returning the survivors and the
/// number removed. The count is a non-fatal diagnostic; a fully sanitized
/// list still yields an (empty) payload group downstream.
pub(crate) fn retain_valid_keywords(keywords: Vec<String>) -> (Vec<String>, usize) {
    let before = keywords.len();
    let valid: Vec<String> = keywords.into_iter().filter(|kw| !sanitize::is_invalid(kw)).collect();
    let dropped = before - valid.len();
    (valid, dropped)
}
