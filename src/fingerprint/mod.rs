//! CDN fingerprinting and cache status classification.
//!
//! This module recognizes the CDN that served a response from its headers and
//! normalizes the CDN's cache status header into a fixed vocabulary:
//!
//! - Detection rules are an ordered list; the first matching rule wins.
//! - Each CDN may register a status rule; everything else uses the default
//!   `x-cache` / `x-cache-status` parser.
//! - Rules are plain data (see [`rules`]) dispatched by a single evaluator, so
//!   they can be inspected and tested without running a classification.

pub mod detection;
pub mod header_set;
pub mod models;
pub mod rules;

pub use detection::{classify, detect_cdn, parse_cache_status};
pub use header_set::HeaderSet;
pub use models::{CacheStatus, CdnId, CdnRule, Classification, Detector, StatusParser, StatusRule};
pub use rules::{cdn_display_name, CDN_RULES};
