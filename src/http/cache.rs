//! `ETag` helpers for conditional static file requests

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted strong `ETag` derived from the content hash, e.g. `"1f2e3d"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// True when `If-None-Match` lists our `ETag` (or `*`), so a 304 can be sent
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|tag| {
            // weak comparison: W/"x" matches "x"
            tag == "*" || tag.trim_start_matches("W/") == etag
        })
    })
}
