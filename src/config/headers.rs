//! HTTP header name constants.
//!
//! This module defines the response headers that are captured from a main-document
//! response. Names are lowercase; matching against raw response headers is
//! case-insensitive. Any header outside [`TRACKED_HEADERS`] is never stored.

// Cloudflare
/// Cloudflare cache status
pub const HEADER_CF_CACHE_STATUS: &str = "cf-cache-status";
/// Cloudflare request ID (`<ray-id>-<POP>`)
pub const HEADER_CF_RAY: &str = "cf-ray";
/// Cloudflare edge location
pub const HEADER_CF_POP: &str = "cf-pop";

// CloudFront
/// CloudFront request ID
pub const HEADER_X_AMZ_CF_ID: &str = "x-amz-cf-id";
/// CloudFront edge location (e.g. `FRA56-P10`)
pub const HEADER_X_AMZ_CF_POP: &str = "x-amz-cf-pop";

// Fastly
/// Fastly cache node chain
pub const HEADER_X_SERVED_BY: &str = "x-served-by";
/// Fastly hit counters per cache layer
pub const HEADER_X_CACHE_HITS: &str = "x-cache-hits";
/// Fastly request timing
pub const HEADER_X_TIMER: &str = "x-timer";

// Akamai
/// Akamai request ID
pub const HEADER_X_AKAMAI_REQUEST_ID: &str = "x-akamai-request-id";

// Bunny CDN
/// Bunny CDN cache status
pub const HEADER_CDN_CACHE: &str = "cdn-cache";
/// Bunny CDN pull zone
pub const HEADER_CDN_PULLZONE: &str = "cdn-pullzone";
/// Bunny CDN request ID
pub const HEADER_CDN_REQUESTID: &str = "cdn-requestid";

// Generic (CloudFront, Fastly, Akamai, Varnish, KeyCDN, etc.)
/// Generic cache status
pub const HEADER_X_CACHE: &str = "x-cache";
/// Alternative generic cache status
pub const HEADER_X_CACHE_STATUS: &str = "x-cache-status";
/// Date the cached copy was stored
pub const HEADER_X_CACHE_DATE: &str = "x-cache-date";
/// Varnish transaction IDs
pub const HEADER_X_VARNISH: &str = "x-varnish";
/// Generic edge location
pub const HEADER_X_EDGE_LOCATION: &str = "x-edge-location";
/// Proxy chain
pub const HEADER_VIA: &str = "via";

// Standard cache headers
pub const HEADER_AGE: &str = "age";
pub const HEADER_CACHE_CONTROL: &str = "cache-control";
pub const HEADER_EXPIRES: &str = "expires";
pub const HEADER_ETAG: &str = "etag";
pub const HEADER_LAST_MODIFIED: &str = "last-modified";
pub const HEADER_VARY: &str = "vary";
pub const HEADER_PRAGMA: &str = "pragma";

// Response metadata
/// Server software
pub const HEADER_SERVER: &str = "server";
pub const HEADER_CONTENT_TYPE: &str = "content-type";

/// List of headers captured from main-document responses.
///
/// To add/remove headers, modify this array. Header names outside this list
/// are dropped when a [`HeaderSet`](crate::HeaderSet) is built.
pub const TRACKED_HEADERS: &[&str] = &[
    // Cloudflare
    HEADER_CF_CACHE_STATUS,
    HEADER_CF_RAY,
    HEADER_CF_POP,
    // CloudFront
    HEADER_X_AMZ_CF_ID,
    HEADER_X_AMZ_CF_POP,
    // Fastly
    HEADER_X_SERVED_BY,
    HEADER_X_CACHE_HITS,
    HEADER_X_TIMER,
    // Akamai
    HEADER_X_AKAMAI_REQUEST_ID,
    // Bunny CDN
    HEADER_CDN_CACHE,
    HEADER_CDN_PULLZONE,
    HEADER_CDN_REQUESTID,
    // Generic
    HEADER_X_CACHE,
    HEADER_X_CACHE_STATUS,
    HEADER_X_CACHE_DATE,
    HEADER_X_VARNISH,
    HEADER_X_EDGE_LOCATION,
    HEADER_VIA,
    // Standard cache headers
    HEADER_AGE,
    HEADER_CACHE_CONTROL,
    HEADER_EXPIRES,
    HEADER_ETAG,
    HEADER_LAST_MODIFIED,
    HEADER_VARY,
    HEADER_PRAGMA,
    // Response metadata
    HEADER_SERVER,
    HEADER_CONTENT_TYPE,
];

/// Headers shown in the popup's cache section, in display order.
pub const CACHE_HEADERS: &[&str] = &[
    // Status
    HEADER_X_CACHE,
    HEADER_CF_CACHE_STATUS,
    HEADER_CDN_CACHE,
    // Edge location
    HEADER_X_AMZ_CF_POP,
    HEADER_CF_POP,
    HEADER_X_EDGE_LOCATION,
    HEADER_X_SERVED_BY,
    // Cache timing and control
    HEADER_AGE,
    HEADER_EXPIRES,
    HEADER_CACHE_CONTROL,
    HEADER_ETAG,
    HEADER_LAST_MODIFIED,
    HEADER_VARY,
    HEADER_PRAGMA,
    // CDN-specific identifiers
    HEADER_CF_RAY,
    HEADER_X_AMZ_CF_ID,
    HEADER_X_AKAMAI_REQUEST_ID,
    HEADER_CDN_REQUESTID,
    HEADER_CDN_PULLZONE,
    HEADER_X_CACHE_HITS,
    HEADER_X_TIMER,
    HEADER_X_VARNISH,
];

/// Headers shown in the popup's response section.
pub const RESPONSE_HEADERS: &[&str] = &[HEADER_SERVER, HEADER_CONTENT_TYPE, HEADER_VIA];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tracked_headers_are_lowercase_and_unique() {
        let mut seen = HashSet::new();
        for name in TRACKED_HEADERS {
            assert_eq!(*name, name.to_ascii_lowercase(), "{name} must be lowercase");
            assert!(seen.insert(*name), "{name} listed twice");
        }
        assert_eq!(TRACKED_HEADERS.len(), 27);
    }

    #[test]
    fn test_display_groups_only_use_tracked_headers() {
        for name in CACHE_HEADERS.iter().chain(RESPONSE_HEADERS) {
            assert!(TRACKED_HEADERS.contains(name), "{name} is not tracked");
        }
    }
}
