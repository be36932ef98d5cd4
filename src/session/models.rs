//! Per-tab session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::{Classification, HeaderSet};

/// Browser tab identifier.
pub type TabId = i64;
/// Frame identifier within a tab; `0` is the main frame.
pub type FrameId = i64;
/// Browser window identifier.
pub type WindowId = i64;

/// Frame id of the top-level document.
pub const MAIN_FRAME_ID: FrameId = 0;

/// Page timing metrics reported by the content collector (milliseconds / bytes).
///
/// Opaque to the state machine: it is attached to a session and passed through
/// to observers unchanged. Every field is optional because the collector
/// reports `null` for timings the browser could not measure, and keys this
/// type does not name are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(default)]
    pub dns: Option<f64>,
    #[serde(default)]
    pub tcp: Option<f64>,
    #[serde(default)]
    pub tls: Option<f64>,
    /// Time to first byte
    #[serde(default)]
    pub ttfb: Option<f64>,
    #[serde(default)]
    pub download: Option<f64>,
    #[serde(default)]
    pub dom_interactive: Option<f64>,
    #[serde(default)]
    pub page_load: Option<f64>,
    #[serde(default)]
    pub transfer_size: Option<f64>,
    #[serde(default)]
    pub encoded_size: Option<f64>,
    #[serde(default)]
    pub decoded_size: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// State of one tab's current document.
///
/// Serialized in the shape observers receive: `cdn` and `status` sit at the
/// top level next to `url` and `headers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSession {
    pub url: String,
    pub headers: HeaderSet,
    #[serde(flatten)]
    pub classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
    /// Navigation completed without any response event for it
    pub no_headers: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// URL of the response the classification came from; `url` moves on to
    /// the final document URL after redirects.
    #[serde(skip)]
    pub response_url: Option<String>,
}

impl TabSession {
    /// Session for a classified main-document response.
    pub fn classified(
        url: impl Into<String>,
        headers: HeaderSet,
        classification: Classification,
    ) -> Self {
        let url = url.into();
        Self {
            response_url: Some(url.clone()),
            url,
            headers,
            classification,
            performance: None,
            no_headers: false,
            timestamp: Utc::now(),
        }
    }

    /// Session holding only a URL (no classification yet).
    pub fn minimal(url: impl Into<String>) -> Self {
        Self {
            response_url: None,
            ..Self::classified(url, HeaderSet::default(), Classification::default())
        }
    }

    /// Whether the popup should suggest a reload.
    pub fn needs_reload(&self) -> bool {
        self.no_headers && self.headers.is_empty()
    }

    pub(crate) fn touch(&mut self) {
        self.timestamp = Utc::now();
    }
}

/// Navigation that started but has not completed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNavigation {
    pub url: String,
    pub started_at: DateTime<Utc>,
    pub headers_received: bool,
}

impl PendingNavigation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            started_at: Utc::now(),
            headers_received: false,
        }
    }
}

/// Lifecycle state of a tab, derived from its session and pending navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabState {
    Empty,
    Pending,
    Classified,
    NoHeaders,
}
