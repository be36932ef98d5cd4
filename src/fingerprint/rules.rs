//! Built-in CDN detection and cache status rules.
//!
//! Detection rules are evaluated in declaration order and the first match wins,
//! so provider-specific signatures come before the generic `x-cache` fallback.
//! A response carrying both `cf-cache-status` and `x-cache` is Cloudflare.

use crate::config::{
    HEADER_CDN_CACHE, HEADER_CDN_PULLZONE, HEADER_CF_CACHE_STATUS, HEADER_CF_RAY, HEADER_SERVER,
    HEADER_VIA, HEADER_X_AKAMAI_REQUEST_ID, HEADER_X_AMZ_CF_ID, HEADER_X_AMZ_CF_POP,
    HEADER_X_CACHE, HEADER_X_CACHE_STATUS, HEADER_X_SERVED_BY, HEADER_X_TIMER, HEADER_X_VARNISH,
    GENERIC_CDN_NAME,
};
use crate::fingerprint::models::{CdnId, CdnRule, Detector, StatusParser, StatusRule};

/// CDN detection rules, in evaluation order.
pub const CDN_RULES: &[CdnRule] = &[
    CdnRule {
        id: CdnId::Cloudflare,
        display_name: "Cloudflare",
        detectors: &[
            Detector::present(HEADER_CF_CACHE_STATUS),
            Detector::present(HEADER_CF_RAY),
        ],
    },
    CdnRule {
        id: CdnId::Cloudfront,
        display_name: "CloudFront",
        detectors: &[
            Detector::present(HEADER_X_AMZ_CF_ID),
            Detector::present(HEADER_X_AMZ_CF_POP),
            Detector::contains(HEADER_VIA, "cloudfront"),
        ],
    },
    CdnRule {
        id: CdnId::Fastly,
        display_name: "Fastly",
        detectors: &[
            Detector::present(HEADER_X_SERVED_BY),
            Detector::present(HEADER_X_TIMER),
        ],
    },
    CdnRule {
        id: CdnId::Akamai,
        display_name: "Akamai",
        detectors: &[
            Detector::present(HEADER_X_AKAMAI_REQUEST_ID),
            Detector::contains(HEADER_SERVER, "akamai"),
            Detector::contains(HEADER_VIA, "akamai"),
        ],
    },
    CdnRule {
        id: CdnId::Bunny,
        display_name: "Bunny CDN",
        detectors: &[
            Detector::present(HEADER_CDN_CACHE),
            Detector::present(HEADER_CDN_PULLZONE),
        ],
    },
    CdnRule {
        id: CdnId::Varnish,
        display_name: "Varnish",
        detectors: &[
            Detector::present(HEADER_X_VARNISH),
            Detector::contains(HEADER_VIA, "varnish"),
        ],
    },
    CdnRule {
        id: CdnId::Generic,
        display_name: GENERIC_CDN_NAME,
        detectors: &[
            Detector::present(HEADER_X_CACHE),
            Detector::present(HEADER_X_CACHE_STATUS),
        ],
    },
];

/// Per-CDN cache status rules. CDNs without an entry use [`DEFAULT_STATUS_RULE`].
pub const STATUS_RULES: &[(CdnId, StatusRule)] = &[
    (
        CdnId::Cloudflare,
        StatusRule::Uppercase {
            header: HEADER_CF_CACHE_STATUS,
        },
    ),
    (
        CdnId::Bunny,
        StatusRule::SingleHeaderParser {
            header: HEADER_CDN_CACHE,
            parser: StatusParser::HitMiss,
        },
    ),
];

/// Status rule for CDNs without a dedicated entry, and for unclassified responses.
pub const DEFAULT_STATUS_RULE: StatusRule = StatusRule::MultiHeaderParser {
    headers: &[HEADER_X_CACHE, HEADER_X_CACHE_STATUS],
    parser: StatusParser::Generic,
};

/// Looks up the status rule for a CDN, falling back to the default rule.
pub fn status_rule_for(cdn: Option<CdnId>) -> &'static StatusRule {
    cdn.and_then(|id| {
        STATUS_RULES
            .iter()
            .find(|(rule_id, _)| *rule_id == id)
            .map(|(_, rule)| rule)
    })
    .unwrap_or(&DEFAULT_STATUS_RULE)
}

/// Looks up the detection rule for a CDN id.
pub fn cdn_rule(id: CdnId) -> Option<&'static CdnRule> {
    CDN_RULES.iter().find(|rule| rule.id == id)
}

/// Display name for a CDN id; `"CDN"` when absent.
pub fn cdn_display_name(id: Option<CdnId>) -> &'static str {
    id.and_then(cdn_rule)
        .map(|rule| rule.display_name)
        .unwrap_or(GENERIC_CDN_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TRACKED_HEADERS;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_cdn_has_exactly_one_detection_rule() {
        for id in CdnId::iter() {
            let count = CDN_RULES.iter().filter(|rule| rule.id == id).count();
            assert_eq!(count, 1, "{id} should have exactly one rule");
        }
    }

    #[test]
    fn test_generic_rule_is_evaluated_last() {
        assert_eq!(CDN_RULES.last().map(|rule| rule.id), Some(CdnId::Generic));
        assert_eq!(CDN_RULES.first().map(|rule| rule.id), Some(CdnId::Cloudflare));
    }

    #[test]
    fn test_rules_only_reference_tracked_headers() {
        for rule in CDN_RULES {
            for detector in rule.detectors {
                assert!(TRACKED_HEADERS.contains(&detector.header));
                if let Some(needle) = detector.contains {
                    assert_eq!(needle, needle.to_lowercase());
                }
            }
        }
    }

    #[test]
    fn test_status_rule_lookup_falls_back_to_default() {
        assert!(matches!(
            status_rule_for(Some(CdnId::Cloudflare)),
            StatusRule::Uppercase { .. }
        ));
        assert!(matches!(
            status_rule_for(Some(CdnId::Bunny)),
            StatusRule::SingleHeaderParser {
                parser: StatusParser::HitMiss,
                ..
            }
        ));
        assert_eq!(status_rule_for(Some(CdnId::Fastly)), &DEFAULT_STATUS_RULE);
        assert_eq!(status_rule_for(None), &DEFAULT_STATUS_RULE);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(cdn_display_name(Some(CdnId::Bunny)), "Bunny CDN");
        assert_eq!(cdn_display_name(Some(CdnId::Cloudfront)), "CloudFront");
        assert_eq!(cdn_display_name(Some(CdnId::Generic)), "CDN");
        assert_eq!(cdn_display_name(None), "CDN");
    }

    #[test]
    fn test_rules_serialize_for_inspection() {
        let json = serde_json::to_value(DEFAULT_STATUS_RULE).expect("serialize");
        assert_eq!(json["kind"], "multi_header_parser");
        assert_eq!(json["parser"], "generic");
        assert_eq!(json["headers"][0], "x-cache");
    }
}
