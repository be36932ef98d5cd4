//! CDN detection fixtures.
//!
//! Each case lists response headers and the expected `(cdn, status)` pair,
//! covering every provider rule, the generic fallback, and the precedence
//! edge cases.

use cdn_cache_status::{
    cdn_display_name, classify, detect_cdn, parse_cache_status, CacheStatus, CdnId, HeaderSet,
    CDN_RULES,
};

struct Case {
    name: &'static str,
    headers: &'static [(&'static str, &'static str)],
    cdn: Option<CdnId>,
    status: Option<&'static str>,
}

const CASES: &[Case] = &[
    // Cloudflare
    Case {
        name: "Cloudflare - HIT via cf-cache-status",
        headers: &[("cf-cache-status", "HIT"), ("cf-ray", "12345-FRA")],
        cdn: Some(CdnId::Cloudflare),
        status: Some("HIT"),
    },
    Case {
        name: "Cloudflare - MISS",
        headers: &[("cf-cache-status", "MISS"), ("cf-ray", "12345-LAX")],
        cdn: Some(CdnId::Cloudflare),
        status: Some("MISS"),
    },
    Case {
        name: "Cloudflare - DYNAMIC",
        headers: &[("cf-cache-status", "DYNAMIC"), ("cf-ray", "12345-SIN")],
        cdn: Some(CdnId::Cloudflare),
        status: Some("DYNAMIC"),
    },
    Case {
        name: "Cloudflare - only cf-ray",
        headers: &[("cf-ray", "12345-FRA")],
        cdn: Some(CdnId::Cloudflare),
        status: None,
    },
    // CloudFront
    Case {
        name: "CloudFront - HIT via x-cache",
        headers: &[
            ("x-amz-cf-id", "abc123"),
            ("x-amz-cf-pop", "FRA50-C1"),
            ("x-cache", "Hit from cloudfront"),
        ],
        cdn: Some(CdnId::Cloudfront),
        status: Some("HIT"),
    },
    Case {
        name: "CloudFront - MISS",
        headers: &[
            ("x-amz-cf-pop", "IAD89-C2"),
            ("x-cache", "Miss from cloudfront"),
        ],
        cdn: Some(CdnId::Cloudfront),
        status: Some("MISS"),
    },
    Case {
        name: "CloudFront - via header",
        headers: &[
            ("via", "1.1 abc123.cloudfront.net (CloudFront)"),
            ("x-cache", "Hit from cloudfront"),
        ],
        cdn: Some(CdnId::Cloudfront),
        status: Some("HIT"),
    },
    // Fastly
    Case {
        name: "Fastly - HIT via x-served-by",
        headers: &[
            ("x-served-by", "cache-fra-eddf8230063-FRA"),
            ("x-cache", "HIT"),
            ("x-cache-hits", "1"),
        ],
        cdn: Some(CdnId::Fastly),
        status: Some("HIT"),
    },
    Case {
        name: "Fastly - MISS",
        headers: &[("x-served-by", "cache-lax-1234"), ("x-cache", "MISS")],
        cdn: Some(CdnId::Fastly),
        status: Some("MISS"),
    },
    Case {
        name: "Fastly - tiered cache reports HIT if any layer hit",
        headers: &[
            ("x-served-by", "cache-fra-123, cache-lhr-456"),
            ("x-cache", "MISS, HIT, MISS"),
        ],
        cdn: Some(CdnId::Fastly),
        status: Some("HIT"),
    },
    Case {
        name: "Fastly - x-timer only",
        headers: &[("x-timer", "S1234567890.123456,VS0,VE50")],
        cdn: Some(CdnId::Fastly),
        status: None,
    },
    // Akamai
    Case {
        name: "Akamai - x-akamai-request-id",
        headers: &[("x-akamai-request-id", "12345abcdef"), ("x-cache", "TCP_HIT")],
        cdn: Some(CdnId::Akamai),
        status: Some("HIT"),
    },
    Case {
        name: "Akamai - server AkamaiGHost",
        headers: &[("server", "AkamaiGHost"), ("x-cache", "TCP_MISS")],
        cdn: Some(CdnId::Akamai),
        status: Some("MISS"),
    },
    Case {
        name: "Akamai - server AkamaiNetStorage",
        headers: &[("server", "AkamaiNetStorage")],
        cdn: Some(CdnId::Akamai),
        status: None,
    },
    Case {
        name: "Akamai - via header, compound status",
        headers: &[("via", "1.1 akamai.net"), ("x-cache", "TCP_REFRESH_HIT")],
        cdn: Some(CdnId::Akamai),
        status: Some("HIT"),
    },
    // Bunny CDN
    Case {
        name: "Bunny - HIT via cdn-cache",
        headers: &[
            ("cdn-cache", "HIT"),
            ("cdn-pullzone", "my-zone"),
            ("cdn-requestid", "abc123"),
        ],
        cdn: Some(CdnId::Bunny),
        status: Some("HIT"),
    },
    Case {
        name: "Bunny - MISS",
        headers: &[("cdn-cache", "MISS"), ("cdn-pullzone", "my-zone")],
        cdn: Some(CdnId::Bunny),
        status: Some("MISS"),
    },
    // Varnish
    Case {
        name: "Varnish - x-varnish",
        headers: &[("x-varnish", "12345 67890"), ("x-cache", "HIT")],
        cdn: Some(CdnId::Varnish),
        status: Some("HIT"),
    },
    Case {
        name: "Varnish - via header",
        headers: &[("via", "1.1 varnish (Varnish/6.0)"), ("x-cache", "MISS")],
        cdn: Some(CdnId::Varnish),
        status: Some("MISS"),
    },
    // Generic fallback
    Case {
        name: "Generic - x-cache only",
        headers: &[("x-cache", "HIT")],
        cdn: Some(CdnId::Generic),
        status: Some("HIT"),
    },
    Case {
        name: "Generic - x-cache-status BYPASS",
        headers: &[("x-cache-status", "BYPASS")],
        cdn: Some(CdnId::Generic),
        status: Some("BYPASS"),
    },
    // No CDN
    Case {
        name: "No CDN - standard headers only",
        headers: &[
            ("cache-control", "max-age=3600"),
            ("server", "nginx"),
            ("content-type", "text/html"),
        ],
        cdn: None,
        status: None,
    },
    Case {
        name: "No CDN - empty headers",
        headers: &[],
        cdn: None,
        status: None,
    },
    // Edge cases
    Case {
        name: "Lowercase akamai in server",
        headers: &[("server", "akamaighost")],
        cdn: Some(CdnId::Akamai),
        status: None,
    },
    Case {
        name: "Cloudflare takes precedence over generic x-cache",
        headers: &[("cf-cache-status", "HIT"), ("x-cache", "MISS")],
        cdn: Some(CdnId::Cloudflare),
        status: Some("HIT"),
    },
    Case {
        name: "REFRESH status",
        headers: &[("x-served-by", "cache-fra-123"), ("x-cache", "REFRESH")],
        cdn: Some(CdnId::Fastly),
        status: Some("REFRESH"),
    },
    Case {
        name: "ERROR status",
        headers: &[("x-varnish", "12345"), ("x-cache", "ERROR")],
        cdn: Some(CdnId::Varnish),
        status: Some("ERROR"),
    },
];

#[test]
fn test_detection_fixtures() {
    let mut failures = Vec::new();
    for case in CASES {
        let headers = HeaderSet::from_pairs(case.headers.iter().copied());
        let cdn = detect_cdn(&headers);
        let status = parse_cache_status(&headers, cdn);
        let status_str = status.as_ref().map(CacheStatus::as_str);

        if cdn != case.cdn || status_str != case.status {
            failures.push(format!(
                "{}: expected cdn={:?} status={:?}, got cdn={:?} status={:?}",
                case.name, case.cdn, case.status, cdn, status_str
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn test_fixtures_are_insertion_order_independent() {
    for case in CASES {
        let forward = HeaderSet::from_pairs(case.headers.iter().copied());
        let reversed = HeaderSet::from_pairs(case.headers.iter().rev().copied());
        assert_eq!(classify(&forward), classify(&reversed), "{}", case.name);
    }
}

#[test]
fn test_header_names_are_case_insensitive() {
    let headers = HeaderSet::from_pairs([("Server", "AkamaiGHost"), ("X-Cache", "TCP_MISS")]);
    let classification = classify(&headers);
    assert_eq!(classification.cdn, Some(CdnId::Akamai));
    assert_eq!(classification.status, Some(CacheStatus::Miss));
}

#[test]
fn test_untracked_headers_never_stored() {
    let headers = HeaderSet::from_pairs([
        ("set-cookie", "session=secret"),
        ("x-request-id", "abc"),
        ("cf-ray", "1-FRA"),
    ]);
    assert_eq!(headers.len(), 1);
    assert!(headers.get("set-cookie").is_none());
}

#[test]
fn test_cloudflare_passes_unknown_values_through() {
    let headers = HeaderSet::from_pairs([("cf-cache-status", "updating")]);
    assert_eq!(
        classify(&headers).status,
        Some(CacheStatus::Other("UPDATING".to_string()))
    );
}

#[test]
fn test_every_rule_has_a_display_name() {
    for rule in CDN_RULES {
        assert_eq!(cdn_display_name(Some(rule.id)), rule.display_name);
    }
    assert_eq!(cdn_display_name(None), "CDN");
}
