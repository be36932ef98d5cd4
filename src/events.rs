//! Inbound browser events and runtime messages.
//!
//! These mirror the host browser's event payloads closely enough to be decoded
//! straight from JSON (one event per line in the replay format).

use serde::{Deserialize, Serialize};

use crate::error_handling::EventError;
use crate::fingerprint::HeaderSet;
use crate::display::PopupView;
use crate::session::{FrameId, PerformanceMetrics, TabId, TabSession, WindowId};

/// Window id reported when focus leaves all browser windows.
pub const WINDOW_ID_NONE: WindowId = -1;

/// Resource type of an observed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    MainFrame,
    SubFrame,
    #[serde(other)]
    Other,
}

/// One raw response header as delivered by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// Payload shared by the two response-observation events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetails {
    pub tab_id: TabId,
    pub frame_id: FrameId,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub url: String,
    #[serde(default)]
    pub response_headers: Vec<HttpHeader>,
}

impl ResponseDetails {
    /// Tracked headers of this response.
    pub fn header_set(&self) -> HeaderSet {
        HeaderSet::from_pairs(
            self.response_headers
                .iter()
                .map(|h| (h.name.as_str(), h.value.clone().unwrap_or_default())),
        )
    }
}

/// Tab a runtime message was sent from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderTab {
    pub id: TabId,
    #[serde(default)]
    pub url: String,
}

/// Messages from the popup and content scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuntimeMessage {
    #[serde(rename_all = "camelCase")]
    GetTabData { tab_id: TabId },
    PerformanceData { metrics: PerformanceMetrics },
    #[serde(rename_all = "camelCase")]
    ColorScheme { is_dark: bool },
}

/// Reply to a runtime message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "camelCase")]
pub enum MessageReply {
    #[serde(rename_all = "camelCase")]
    TabData {
        tab_id: TabId,
        data: Option<TabSession>,
        /// What the popup renders for `data`.
        popup: PopupView,
    },
}

/// Every event the background process reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InboundEvent {
    #[serde(rename_all = "camelCase")]
    NavigationStart {
        tab_id: TabId,
        frame_id: FrameId,
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    NavigationComplete {
        tab_id: TabId,
        frame_id: FrameId,
        url: String,
    },
    ResponseHeaders(ResponseDetails),
    /// Fallback alias of `ResponseHeaders`; handled identically.
    ResponseStarted(ResponseDetails),
    #[serde(rename_all = "camelCase")]
    TabClosed { tab_id: TabId },
    #[serde(rename_all = "camelCase")]
    TabActivated {
        tab_id: TabId,
        #[serde(default)]
        window_id: Option<WindowId>,
    },
    #[serde(rename_all = "camelCase")]
    WindowFocusChanged { window_id: WindowId },
    Message {
        message: RuntimeMessage,
        #[serde(default)]
        sender: Option<SenderTab>,
    },
    /// Popup connection handshake.
    #[serde(rename_all = "camelCase")]
    Subscribe { tab_id: TabId },
    /// Popup connection closed.
    #[serde(rename_all = "camelCase")]
    Disconnect { tab_id: TabId },
}

impl InboundEvent {
    /// Decodes one line of the replay format.
    pub fn from_json_line(line: &str, line_number: usize) -> Result<Self, EventError> {
        serde_json::from_str(line).map_err(|source| EventError::Malformed {
            line: line_number,
            source,
        })
    }
}
