// Shared test helpers for building services and browser events.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::sync::{Arc, Mutex};

use cdn_cache_status::events::{HttpHeader, ResponseDetails, SenderTab};
use cdn_cache_status::{
    BackgroundService, BadgeError, BadgeScope, BadgeSink, BadgeState, EventStats, InboundEvent,
    PerformanceMetrics, RequestType, RuntimeMessage, SharedTheme, TabId,
};

/// Badge calls recorded by [`RecordingSink`].
pub type BadgeCalls = Arc<Mutex<Vec<(BadgeScope, BadgeState)>>>;

/// Badge sink that records every successful call and can simulate a platform
/// without per-tab badges.
pub struct RecordingSink {
    calls: BadgeCalls,
    per_tab_supported: bool,
}

impl BadgeSink for RecordingSink {
    fn set_badge(&mut self, scope: BadgeScope, state: &BadgeState) -> Result<(), BadgeError> {
        if matches!(scope, BadgeScope::Tab(_)) && !self.per_tab_supported {
            return Err(BadgeError::Unsupported);
        }
        self.calls
            .lock()
            .expect("badge log lock")
            .push((scope, state.clone()));
        Ok(())
    }
}

/// Creates a service backed by a recording badge sink.
#[allow(dead_code)] // Used by other test files
pub fn create_test_service(per_tab_supported: bool) -> (BackgroundService, BadgeCalls) {
    let calls = BadgeCalls::default();
    let sink = RecordingSink {
        calls: Arc::clone(&calls),
        per_tab_supported,
    };
    let service = BackgroundService::new(
        Box::new(sink),
        true,
        SharedTheme::default(),
        Arc::new(EventStats::new()),
    );
    (service, calls)
}

/// Last badge state rendered with the given scope.
#[allow(dead_code)] // Used by other test files
pub fn last_badge(calls: &BadgeCalls, scope: BadgeScope) -> Option<BadgeState> {
    calls
        .lock()
        .expect("badge log lock")
        .iter()
        .rev()
        .find(|(s, _)| *s == scope)
        .map(|(_, state)| state.clone())
}

#[allow(dead_code)] // Used by other test files
pub fn nav_start(tab_id: TabId, url: &str) -> InboundEvent {
    InboundEvent::NavigationStart {
        tab_id,
        frame_id: 0,
        url: url.to_string(),
    }
}

#[allow(dead_code)] // Used by other test files
pub fn nav_complete(tab_id: TabId, url: &str) -> InboundEvent {
    InboundEvent::NavigationComplete {
        tab_id,
        frame_id: 0,
        url: url.to_string(),
    }
}

#[allow(dead_code)] // Used by other test files
pub fn response_details(tab_id: TabId, url: &str, headers: &[(&str, &str)]) -> ResponseDetails {
    ResponseDetails {
        tab_id,
        frame_id: 0,
        request_type: RequestType::MainFrame,
        url: url.to_string(),
        response_headers: headers
            .iter()
            .map(|(name, value)| HttpHeader::new(*name, *value))
            .collect(),
    }
}

/// Main-frame `responseHeaders` event.
#[allow(dead_code)] // Used by other test files
pub fn response(tab_id: TabId, url: &str, headers: &[(&str, &str)]) -> InboundEvent {
    InboundEvent::ResponseHeaders(response_details(tab_id, url, headers))
}

/// Main-frame `responseStarted` event (the fallback alias).
#[allow(dead_code)] // Used by other test files
pub fn response_started(tab_id: TabId, url: &str, headers: &[(&str, &str)]) -> InboundEvent {
    InboundEvent::ResponseStarted(response_details(tab_id, url, headers))
}

#[allow(dead_code)] // Used by other test files
pub fn performance(tab_id: TabId, url: &str, metrics: PerformanceMetrics) -> InboundEvent {
    InboundEvent::Message {
        message: RuntimeMessage::PerformanceData { metrics },
        sender: Some(SenderTab {
            id: tab_id,
            url: url.to_string(),
        }),
    }
}

#[allow(dead_code)] // Used by other test files
pub fn get_tab_data(tab_id: TabId) -> InboundEvent {
    InboundEvent::Message {
        message: RuntimeMessage::GetTabData { tab_id },
        sender: None,
    }
}
