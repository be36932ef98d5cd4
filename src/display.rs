//! Presentation helpers for the popup surface.
//!
//! Pure functions over already-classified data: header labels, edge location
//! lookup, value formatting and the popup's top-level state.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::{
    CACHE_HEADERS, HEADER_AGE, HEADER_CACHE_CONTROL, HEADER_CDN_CACHE, HEADER_CDN_PULLZONE,
    HEADER_CDN_REQUESTID, HEADER_CF_CACHE_STATUS, HEADER_CF_POP, HEADER_CF_RAY,
    HEADER_CONTENT_TYPE, HEADER_ETAG, HEADER_EXPIRES, HEADER_LAST_MODIFIED, HEADER_PRAGMA,
    HEADER_SERVER, HEADER_VARY, HEADER_VIA, HEADER_X_AKAMAI_REQUEST_ID, HEADER_X_AMZ_CF_ID,
    HEADER_X_AMZ_CF_POP, HEADER_X_CACHE, HEADER_X_CACHE_HITS, HEADER_X_CACHE_STATUS,
    HEADER_X_EDGE_LOCATION, HEADER_X_SERVED_BY, HEADER_X_TIMER, HEADER_X_VARNISH,
    RESPONSE_HEADERS, SECS_PER_HOUR, SECS_PER_MINUTE,
};
use crate::fingerprint::{cdn_display_name, CacheStatus, CdnId, HeaderSet};
use crate::session::{PerformanceMetrics, TabSession};

const POP_CODE_PATTERN: &str = r"^([A-Za-z]{3})";

static POP_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(POP_CODE_PATTERN).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in POP_CODE_RE: {}. This is a programming error.",
            POP_CODE_PATTERN, e
        )
    })
});

/// Edge location IATA codes to city names.
static EDGE_LOCATIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // North America
        ("IAD", "Ashburn, VA"),
        ("CMH", "Columbus, OH"),
        ("ORD", "Chicago, IL"),
        ("DFW", "Dallas, TX"),
        ("DEN", "Denver, CO"),
        ("HIO", "Hillsboro, OR"),
        ("IAH", "Houston, TX"),
        ("JAX", "Jacksonville, FL"),
        ("LAX", "Los Angeles, CA"),
        ("MIA", "Miami, FL"),
        ("MSP", "Minneapolis, MN"),
        ("YUL", "Montreal, QC"),
        ("JFK", "New York, NY"),
        ("EWR", "Newark, NJ"),
        ("PHX", "Phoenix, AZ"),
        ("SFO", "San Francisco, CA"),
        ("SEA", "Seattle, WA"),
        ("YTO", "Toronto, ON"),
        ("ATL", "Atlanta, GA"),
        ("BOS", "Boston, MA"),
        ("SLC", "Salt Lake City, UT"),
        ("PDX", "Portland, OR"),
        ("PHL", "Philadelphia, PA"),
        ("CLT", "Charlotte, NC"),
        ("QRO", "Queretaro, MX"),
        // Europe
        ("AMS", "Amsterdam, NL"),
        ("TXL", "Berlin, DE"),
        ("BRU", "Brussels, BE"),
        ("OTP", "Bucharest, RO"),
        ("BUD", "Budapest, HU"),
        ("CPH", "Copenhagen, DK"),
        ("DUB", "Dublin, IE"),
        ("DUS", "Dusseldorf, DE"),
        ("FRA", "Frankfurt, DE"),
        ("HAM", "Hamburg, DE"),
        ("HEL", "Helsinki, FI"),
        ("LIS", "Lisbon, PT"),
        ("LHR", "London, UK"),
        ("MAD", "Madrid, ES"),
        ("MAN", "Manchester, UK"),
        ("MRS", "Marseille, FR"),
        ("MXP", "Milan, IT"),
        ("MUC", "Munich, DE"),
        ("OSL", "Oslo, NO"),
        ("PMO", "Palermo, IT"),
        ("CDG", "Paris, FR"),
        ("PRG", "Prague, CZ"),
        ("FCO", "Rome, IT"),
        ("SOF", "Sofia, BG"),
        ("ARN", "Stockholm, SE"),
        ("VIE", "Vienna, AT"),
        ("WAW", "Warsaw, PL"),
        ("ZAG", "Zagreb, HR"),
        ("ZRH", "Zurich, CH"),
        // Asia Pacific
        ("BLR", "Bangalore, IN"),
        ("BKK", "Bangkok, TH"),
        ("MAA", "Chennai, IN"),
        ("HKG", "Hong Kong"),
        ("HYD", "Hyderabad, IN"),
        ("CGK", "Jakarta, ID"),
        ("CCU", "Kolkata, IN"),
        ("KUL", "Kuala Lumpur, MY"),
        ("MNL", "Manila, PH"),
        ("BOM", "Mumbai, IN"),
        ("DEL", "New Delhi, IN"),
        ("KIX", "Osaka, JP"),
        ("ICN", "Seoul, KR"),
        ("SIN", "Singapore"),
        ("TPE", "Taipei, TW"),
        ("NRT", "Tokyo, JP"),
        ("HND", "Tokyo, JP"),
        // Australia & NZ
        ("AKL", "Auckland, NZ"),
        ("MEL", "Melbourne, AU"),
        ("PER", "Perth, AU"),
        ("SYD", "Sydney, AU"),
        ("BNE", "Brisbane, AU"),
        // South America
        ("EZE", "Buenos Aires, AR"),
        ("BOG", "Bogota, CO"),
        ("FOR", "Fortaleza, BR"),
        ("LIM", "Lima, PE"),
        ("GRU", "Sao Paulo, BR"),
        ("SCL", "Santiago, CL"),
        ("GIG", "Rio de Janeiro, BR"),
        // Middle East & Africa
        ("BAH", "Bahrain"),
        ("CPT", "Cape Town, ZA"),
        ("DXB", "Dubai, AE"),
        ("FJR", "Fujairah, AE"),
        ("JNB", "Johannesburg, ZA"),
        ("NBO", "Nairobi, KE"),
        ("TLV", "Tel Aviv, IL"),
    ])
});

/// City for an IATA edge code (case-insensitive).
pub fn edge_location(code: &str) -> Option<&'static str> {
    EDGE_LOCATIONS
        .get(code.to_ascii_uppercase().as_str())
        .copied()
}

/// Human label for a tracked header; unknown names are shown as-is.
pub fn header_label(name: &str) -> &str {
    match name {
        HEADER_CF_CACHE_STATUS | HEADER_CDN_CACHE | HEADER_X_CACHE_STATUS => "Cache Status",
        HEADER_CF_RAY => "CF-Ray",
        HEADER_CF_POP | HEADER_X_AMZ_CF_POP | HEADER_X_EDGE_LOCATION => "Edge Location",
        HEADER_X_AMZ_CF_ID | HEADER_X_AKAMAI_REQUEST_ID | HEADER_CDN_REQUESTID => "Request ID",
        HEADER_X_SERVED_BY => "Served By",
        HEADER_X_CACHE_HITS => "Cache Hits",
        HEADER_X_TIMER => "Timer",
        HEADER_CDN_PULLZONE => "Pull Zone",
        HEADER_X_CACHE => "X-Cache",
        HEADER_X_VARNISH => "Varnish ID",
        HEADER_VIA => "Via",
        HEADER_AGE => "Age",
        HEADER_CACHE_CONTROL => "Cache-Control",
        HEADER_EXPIRES => "Expires",
        HEADER_ETAG => "ETag",
        HEADER_LAST_MODIFIED => "Last-Modified",
        HEADER_VARY => "Vary",
        HEADER_PRAGMA => "Pragma",
        HEADER_SERVER => "Server",
        HEADER_CONTENT_TYPE => "Content-Type",
        other => other,
    }
}

/// Formats a header value for display.
///
/// `age` becomes a duration, `cf-ray` and the POP headers resolve their edge
/// code to a city. Anything else (or anything unparseable) is returned as-is.
pub fn format_header_value(name: &str, value: &str) -> String {
    match name {
        HEADER_AGE => {
            if let Ok(seconds) = value.trim().parse::<u64>() {
                return format_age(seconds);
            }
        }
        HEADER_CF_RAY => {
            if let Some((_, code)) = value.rsplit_once('-') {
                let code = code.to_ascii_uppercase();
                if let Some(city) = edge_location(&code) {
                    return format!("{city} ({code})");
                }
            }
        }
        HEADER_X_AMZ_CF_POP | HEADER_CF_POP => {
            if let Some(city) = POP_CODE_RE
                .captures(value)
                .and_then(|caps| caps.get(1))
                .and_then(|code| edge_location(code.as_str()))
            {
                return format!("{city} ({value})");
            }
        }
        _ => {}
    }
    value.to_string()
}

fn format_age(seconds: u64) -> String {
    if seconds < SECS_PER_MINUTE {
        format!("{seconds}s")
    } else if seconds < SECS_PER_HOUR {
        format!("{}m {}s", seconds / SECS_PER_MINUTE, seconds % SECS_PER_MINUTE)
    } else {
        format!(
            "{}h {}m",
            seconds / SECS_PER_HOUR,
            (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE
        )
    }
}

/// `N ms` below one second, `N.NN s` above.
pub fn format_duration_ms(ms: i64) -> String {
    if ms < 1000 {
        format!("{ms} ms")
    } else {
        format!("{:.2} s", ms as f64 / 1000.0)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// One-line explanation of a status, naming the CDN for hits.
pub fn status_description(status: &CacheStatus, cdn: Option<CdnId>) -> String {
    let name = cdn_display_name(cdn);
    match status {
        CacheStatus::Hit => format!("Served from {name} cache"),
        CacheStatus::Miss => "Fetched from origin server".into(),
        CacheStatus::Expired => "Cache expired, fetched from origin".into(),
        CacheStatus::Stale => "Serving stale content".into(),
        CacheStatus::Revalidated => "Cache revalidated with origin".into(),
        CacheStatus::Bypass => "Cache bypassed".into(),
        CacheStatus::Dynamic => "Dynamic content, not cached".into(),
        CacheStatus::Refresh => "Cache refreshed from origin".into(),
        CacheStatus::Error => "Error retrieving from origin".into(),
        CacheStatus::Other(_) => format!("{name} cache status"),
    }
}

/// Status description with TTFB and transfer size appended when known.
pub fn status_label(
    status: &CacheStatus,
    cdn: Option<CdnId>,
    performance: Option<&PerformanceMetrics>,
) -> String {
    let mut text = status_description(status, cdn);
    if let Some(metrics) = performance {
        let mut parts = Vec::new();
        if let Some(ttfb) = whole_millis(metrics.ttfb).filter(|t| *t > 0) {
            parts.push(format_duration_ms(ttfb));
        }
        if let Some(size) = whole_bytes(metrics.transfer_size).filter(|b| *b > 0) {
            parts.push(format_bytes(size));
        }
        if !parts.is_empty() {
            text.push_str(&format!(" ({})", parts.join(", ")));
        }
    }
    text
}

/// A labelled, formatted header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRow {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Splits headers into the popup's cache and response sections.
///
/// Each header appears at most once, in the first section that lists it.
pub fn header_sections(headers: &HeaderSet) -> (Vec<HeaderRow>, Vec<HeaderRow>) {
    let mut shown = HashSet::new();
    let mut section = |names: &[&'static str]| -> Vec<HeaderRow> {
        names
            .iter()
            .filter_map(|&name| {
                let value = headers.signal(name)?;
                shown.insert(name).then(|| HeaderRow {
                    name,
                    label: header_label(name),
                    value: format_header_value(name, value),
                })
            })
            .collect()
    };
    let cache = section(CACHE_HEADERS);
    let response = section(RESPONSE_HEADERS);
    (cache, response)
}

fn whole_millis(value: Option<f64>) -> Option<i64> {
    value.filter(|v| v.is_finite()).map(|v| v.round() as i64)
}

fn whole_bytes(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64)
}

/// Performance rows in display order.
///
/// Negative or missing values are skipped; DNS and TLS are also skipped at
/// zero (connection reuse).
pub fn performance_rows(metrics: &PerformanceMetrics) -> Vec<(&'static str, String)> {
    let timings = [
        ("TTFB", metrics.ttfb, false),
        ("DNS Lookup", metrics.dns, true),
        ("TCP Connect", metrics.tcp, false),
        ("TLS Handshake", metrics.tls, true),
        ("Download", metrics.download, false),
        ("DOM Interactive", metrics.dom_interactive, false),
        ("Page Load", metrics.page_load, false),
    ];

    let mut rows: Vec<(&'static str, String)> = timings
        .into_iter()
        .filter_map(|(label, value, skip_zero)| {
            let value = whole_millis(value).filter(|v| *v >= 0 && !(skip_zero && *v == 0))?;
            Some((label, format_duration_ms(value)))
        })
        .collect();
    if let Some(size) = whole_bytes(metrics.transfer_size) {
        rows.push(("Transfer Size", format_bytes(size)));
    }
    rows
}

/// What the popup shows for the current tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PopupState {
    /// No session, or a session without any tracked header.
    NoData,
    /// Navigation completed without a response event; a reload will fix it.
    ReloadSuggested,
    /// Headers were seen but none carried a cache status.
    NoStatus,
    Status { badge: String, label: String },
}

impl PopupState {
    pub fn for_session(session: Option<&TabSession>) -> Self {
        let Some(session) = session else {
            return PopupState::NoData;
        };
        if session.needs_reload() {
            return PopupState::ReloadSuggested;
        }
        if session.headers.is_empty() {
            return PopupState::NoData;
        }
        match &session.classification.status {
            Some(status) => PopupState::Status {
                badge: status.as_str().to_string(),
                label: status_label(
                    status,
                    session.classification.cdn,
                    session.performance.as_ref(),
                ),
            },
            None => PopupState::NoStatus,
        }
    }

    /// Headline text for the state.
    pub fn headline(&self) -> &str {
        match self {
            PopupState::NoData => "No CDN headers detected",
            PopupState::ReloadSuggested => "Reload the page to capture headers",
            PopupState::NoStatus => "No cache status header",
            PopupState::Status { label, .. } => label,
        }
    }
}

/// Everything the popup renders for one tab, as sent with `getTabData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupView {
    pub state: PopupState,
    pub headline: String,
    pub cache_headers: Vec<HeaderRow>,
    pub response_headers: Vec<HeaderRow>,
    pub performance: Vec<(&'static str, String)>,
}

impl PopupView {
    pub fn for_session(session: Option<&TabSession>) -> Self {
        let state = PopupState::for_session(session);
        let headline = state.headline().to_string();
        let (cache_headers, response_headers) = session
            .map(|s| header_sections(&s.headers))
            .unwrap_or_default();
        let performance = session
            .and_then(|s| s.performance.as_ref())
            .map(performance_rows)
            .unwrap_or_default();
        Self {
            state,
            headline,
            cache_headers,
            response_headers,
            performance,
        }
    }
}
