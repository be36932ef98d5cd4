//! CDN and cache status classification.
//!
//! This module provides the classification entry point that runs CDN detection
//! and then the matching status rule over one header snapshot. Both steps are
//! pure functions of the snapshot.

mod headers;
mod status;


pub use headers::{detect_cdn, detect_cdn_with};
pub use status::{apply_status_rule, parse_cache_status, parse_generic_status, parse_hit_miss};

use crate::fingerprint::header_set::HeaderSet;
use crate::fingerprint::models::Classification;

/// Classifies a header snapshot.
///
/// The CDN and the status always come from the same snapshot, so a
/// classification is never partially computed.
pub fn classify(headers: &HeaderSet) -> Classification {
    let cdn = detect_cdn(headers);
    let status = parse_cache_status(headers, cdn);

    log::debug!(
        "Classified {} tracked headers: cdn={}, status={}",
        headers.len(),
        cdn.map(|c| c.as_str()).unwrap_or("none"),
        status.as_ref().map(|s| s.as_str()).unwrap_or("none")
    );

    Classification { cdn, status }
}
