//! Cache status parsing.
//!
//! Every rule variant is dispatched by [`apply_status_rule`]; the substring
//! parsers are shared by all rules that use them.

use crate::fingerprint::header_set::HeaderSet;
use crate::fingerprint::models::{CacheStatus, CdnId, StatusParser, StatusRule};
use crate::fingerprint::rules::status_rule_for;

/// Substring → status table of the generic parser. Order is precedence:
/// `TCP_REFRESH_HIT` is a `HIT` because `hit` is checked before `refresh`.
const GENERIC_PRECEDENCE: &[(&str, CacheStatus)] = &[
    ("hit", CacheStatus::Hit),
    ("miss", CacheStatus::Miss),
    ("refresh", CacheStatus::Refresh),
    ("error", CacheStatus::Error),
    ("pass", CacheStatus::Bypass),
    ("expired", CacheStatus::Expired),
];

const HIT_MISS_PRECEDENCE: &[(&str, CacheStatus)] =
    &[("hit", CacheStatus::Hit), ("miss", CacheStatus::Miss)];

/// Generic parser used for `x-cache` style headers.
pub fn parse_generic_status(value: &str) -> Option<CacheStatus> {
    first_substring_match(GENERIC_PRECEDENCE, value)
}

/// Parser that only recognizes hits and misses (Bunny CDN `cdn-cache`).
pub fn parse_hit_miss(value: &str) -> Option<CacheStatus> {
    first_substring_match(HIT_MISS_PRECEDENCE, value)
}

fn first_substring_match(table: &[(&str, CacheStatus)], value: &str) -> Option<CacheStatus> {
    let lower = value.to_lowercase();
    table
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, status)| status.clone())
}

impl StatusParser {
    pub fn parse(&self, value: &str) -> Option<CacheStatus> {
        match self {
            StatusParser::Generic => parse_generic_status(value),
            StatusParser::HitMiss => parse_hit_miss(value),
        }
    }
}

/// Reads the cache status for a response attributed to `cdn`.
///
/// Uses the CDN's status rule, or the default rule when none is registered.
/// Total: returns `None` when no usable signal exists.
pub fn parse_cache_status(headers: &HeaderSet, cdn: Option<CdnId>) -> Option<CacheStatus> {
    apply_status_rule(status_rule_for(cdn), headers)
}

/// Applies one status rule to a header snapshot.
pub fn apply_status_rule(rule: &StatusRule, headers: &HeaderSet) -> Option<CacheStatus> {
    match rule {
        StatusRule::Uppercase { header } => headers
            .signal(header)
            .map(|value| CacheStatus::from_uppercase(&value.to_uppercase())),
        StatusRule::SingleHeaderParser { header, parser } => {
            headers.signal(header).and_then(|value| parser.parse(value))
        }
        StatusRule::MultiHeaderParser {
            headers: candidates,
            parser,
        } => candidates
            .iter()
            .filter_map(|header| headers.signal(header))
            .find_map(|value| parser.parse(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_parser_is_case_insensitive() {
        assert_eq!(
            parse_generic_status("Hit from cloudfront"),
            Some(CacheStatus::Hit)
        );
        assert_eq!(parse_generic_status("MISS"), Some(CacheStatus::Miss));
        assert_eq!(parse_generic_status("Refresh"), Some(CacheStatus::Refresh));
        assert_eq!(parse_generic_status("error"), Some(CacheStatus::Error));
        assert_eq!(parse_generic_status("PASS"), Some(CacheStatus::Bypass));
        assert_eq!(parse_generic_status("BYPASS"), Some(CacheStatus::Bypass));
        assert_eq!(parse_generic_status("Expired"), Some(CacheStatus::Expired));
    }

    #[test]
    fn test_generic_parser_precedence_on_compound_values() {
        assert_eq!(parse_generic_status("TCP_REFRESH_HIT"), Some(CacheStatus::Hit));
        assert_eq!(parse_generic_status("TCP_REFRESH_MISS"), Some(CacheStatus::Miss));
        assert_eq!(parse_generic_status("MISS, HIT, MISS"), Some(CacheStatus::Hit));
        assert_eq!(parse_generic_status("refresh_error"), Some(CacheStatus::Refresh));
    }

    #[test]
    fn test_generic_parser_returns_none_without_known_substring() {
        assert_eq!(parse_generic_status("STALE"), None);
        assert_eq!(parse_generic_status(""), None);
        assert_eq!(parse_generic_status("DYNAMIC"), None);
    }

    #[test]
    fn test_hit_miss_parser_ignores_other_statuses() {
        assert_eq!(parse_hit_miss("HIT"), Some(CacheStatus::Hit));
        assert_eq!(parse_hit_miss("miss"), Some(CacheStatus::Miss));
        assert_eq!(parse_hit_miss("BYPASS"), None);
        assert_eq!(parse_hit_miss("EXPIRED"), None);
    }

    #[test]
    fn test_uppercase_rule_keeps_provider_value() {
        let rule = StatusRule::Uppercase {
            header: "cf-cache-status",
        };
        let headers = HeaderSet::from_pairs([("cf-cache-status", "revalidated")]);
        assert_eq!(
            apply_status_rule(&rule, &headers),
            Some(CacheStatus::Revalidated)
        );

        let headers = HeaderSet::from_pairs([("cf-cache-status", "updating")]);
        assert_eq!(
            apply_status_rule(&rule, &headers),
            Some(CacheStatus::Other("UPDATING".into()))
        );

        assert_eq!(apply_status_rule(&rule, &HeaderSet::default()), None);
    }

    #[test]
    fn test_multi_header_rule_skips_unparseable_candidates() {
        let headers = HeaderSet::from_pairs([("x-cache", "unknown"), ("x-cache-status", "HIT")]);
        assert_eq!(parse_cache_status(&headers, None), Some(CacheStatus::Hit));

        let headers = HeaderSet::from_pairs([("x-cache", "unknown"), ("x-cache-status", "nope")]);
        assert_eq!(parse_cache_status(&headers, None), None);
    }

    #[test]
    fn test_multi_header_rule_prefers_first_candidate() {
        let headers = HeaderSet::from_pairs([("x-cache", "MISS"), ("x-cache-status", "HIT")]);
        assert_eq!(parse_cache_status(&headers, None), Some(CacheStatus::Miss));
    }

    #[test]
    fn test_cdn_specific_rule_ignores_generic_headers() {
        let headers = HeaderSet::from_pairs([("cdn-pullzone", "zone"), ("x-cache", "HIT")]);
        assert_eq!(parse_cache_status(&headers, Some(CdnId::Bunny)), None);
    }
}
