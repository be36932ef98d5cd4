//! Header-based CDN detection.
//!
//! Walks the CDN rules in declaration order and returns the first rule with a
//! matching detector. There is no best-match scoring: declaration order is the
//! tie-break.

use crate::fingerprint::header_set::HeaderSet;
use crate::fingerprint::models::{CdnId, CdnRule, Detector};
use crate::fingerprint::rules::CDN_RULES;

/// Detects the CDN from a header snapshot using the built-in rules.
pub fn detect_cdn(headers: &HeaderSet) -> Option<CdnId> {
    detect_cdn_with(CDN_RULES, headers)
}

/// Detects the CDN using an explicit rule list.
pub fn detect_cdn_with(rules: &[CdnRule], headers: &HeaderSet) -> Option<CdnId> {
    rules
        .iter()
        .find(|rule| rule.detectors.iter().any(|d| detector_matches(d, headers)))
        .map(|rule| rule.id)
}

fn detector_matches(detector: &Detector, headers: &HeaderSet) -> bool {
    let Some(value) = headers.signal(detector.header) else {
        return false;
    };
    match detector.contains {
        // No needle: presence is enough
        None => true,
        Some(needle) => value.to_lowercase().contains(needle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_detector() {
        let headers = HeaderSet::from_pairs([("x-timer", "S1234567890.123456,VS0,VE50")]);
        assert_eq!(detect_cdn(&headers), Some(CdnId::Fastly));
    }

    #[test]
    fn test_substring_detector_is_case_insensitive() {
        let headers = HeaderSet::from_pairs([("via", "1.1 abc123.cloudfront.net (CloudFront)")]);
        assert_eq!(detect_cdn(&headers), Some(CdnId::Cloudfront));

        let headers = HeaderSet::from_pairs([("server", "AKAMAIGHOST")]);
        assert_eq!(detect_cdn(&headers), Some(CdnId::Akamai));
    }

    #[test]
    fn test_substring_detector_requires_the_substring() {
        let headers = HeaderSet::from_pairs([("via", "1.1 squid"), ("server", "nginx")]);
        assert_eq!(detect_cdn(&headers), None);
    }

    #[test]
    fn test_custom_rule_order_changes_the_winner() {
        const REVERSED: &[CdnRule] = &[
            CdnRule {
                id: CdnId::Generic,
                display_name: "CDN",
                detectors: &[Detector::present("x-cache")],
            },
            CdnRule {
                id: CdnId::Cloudflare,
                display_name: "Cloudflare",
                detectors: &[Detector::present("cf-ray")],
            },
        ];
        let headers = HeaderSet::from_pairs([("cf-ray", "1-FRA"), ("x-cache", "HIT")]);
        assert_eq!(detect_cdn_with(REVERSED, &headers), Some(CdnId::Generic));
        assert_eq!(detect_cdn(&headers), Some(CdnId::Cloudflare));
    }
}
