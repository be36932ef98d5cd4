//! Data structures for CDN fingerprint rules.
//!
//! This module contains the core data structures used for classification:
//! - `CdnId`: Stable identifier of a recognized CDN
//! - `Detector` / `CdnRule`: How a CDN is recognized from response headers
//! - `StatusRule` / `StatusParser`: How a cache status is read for a CDN
//! - `CacheStatus` / `Classification`: The normalized output

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Stable identifier of a recognized CDN.
///
/// Serialized as the lowercase id used by the badge and popup surfaces
/// (`cloudflare`, `cloudfront`, ..., `cdn` for the generic fallback).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CdnId {
    Cloudflare,
    Cloudfront,
    Fastly,
    Akamai,
    Bunny,
    Varnish,
    /// Generic cache headers without a provider-specific signature
    #[serde(rename = "cdn")]
    #[strum(serialize = "cdn")]
    Generic,
}

impl CdnId {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for CdnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detection condition.
///
/// Matches when `header` is present (non-empty) and, if `contains` is set,
/// its value contains that lowercase substring case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detector {
    pub header: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<&'static str>,
}

impl Detector {
    /// Detector that only requires the header to be present.
    pub const fn present(header: &'static str) -> Self {
        Self {
            header,
            contains: None,
        }
    }

    /// Detector that requires the header value to contain `needle`.
    /// `needle` must be lowercase.
    pub const fn contains(header: &'static str, needle: &'static str) -> Self {
        Self {
            header,
            contains: Some(needle),
        }
    }
}

/// CDN detection rule. Detectors are OR-ed and evaluated in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CdnRule {
    pub id: CdnId,
    pub display_name: &'static str,
    pub detectors: &'static [Detector],
}

/// Shared substring parsers mapping a raw header value to a [`CacheStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusParser {
    /// `hit, miss, refresh, error, pass, expired`, first match wins
    Generic,
    /// `hit, miss` only
    HitMiss,
}

/// How a cache status is derived for one CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusRule {
    /// The header value, upper-cased verbatim.
    Uppercase { header: &'static str },
    /// One header passed through a parser.
    SingleHeaderParser {
        header: &'static str,
        parser: StatusParser,
    },
    /// Candidate headers tried in order; the first non-empty parse wins.
    MultiHeaderParser {
        headers: &'static [&'static str],
        parser: StatusParser,
    },
}

/// Normalized cache status.
///
/// The vocabulary is closed. `Other` only carries a value a provider reported
/// verbatim through an [`StatusRule::Uppercase`] rule (e.g. Cloudflare's
/// `UPDATING`); the substring parsers never produce it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CacheStatus {
    Hit,
    Miss,
    Expired,
    Stale,
    Revalidated,
    Refresh,
    Bypass,
    Dynamic,
    Error,
    Other(String),
}

impl CacheStatus {
    /// Maps an already upper-cased value onto the vocabulary.
    pub fn from_uppercase(value: &str) -> Self {
        match value {
            "HIT" => CacheStatus::Hit,
            "MISS" => CacheStatus::Miss,
            "EXPIRED" => CacheStatus::Expired,
            "STALE" => CacheStatus::Stale,
            "REVALIDATED" => CacheStatus::Revalidated,
            "REFRESH" => CacheStatus::Refresh,
            "BYPASS" => CacheStatus::Bypass,
            "DYNAMIC" => CacheStatus::Dynamic,
            "ERROR" => CacheStatus::Error,
            other => CacheStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Expired => "EXPIRED",
            CacheStatus::Stale => "STALE",
            CacheStatus::Revalidated => "REVALIDATED",
            CacheStatus::Refresh => "REFRESH",
            CacheStatus::Bypass => "BYPASS",
            CacheStatus::Dynamic => "DYNAMIC",
            CacheStatus::Error => "ERROR",
            CacheStatus::Other(value) => value,
        }
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CacheStatus> for String {
    fn from(status: CacheStatus) -> Self {
        status.as_str().to_string()
    }
}

impl From<String> for CacheStatus {
    fn from(value: String) -> Self {
        CacheStatus::from_uppercase(&value.to_uppercase())
    }
}

/// Result of classifying one header snapshot.
///
/// Both fields always come from the same classification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub cdn: Option<CdnId>,
    pub status: Option<CacheStatus>,
}
