//! Per-tab navigation state machine.
//!
//! The registry owns every [`TabSession`] and [`PendingNavigation`]. Events for
//! one tab are applied strictly in arrival order; events for different tabs
//! never touch each other's entries.
//!
//! ```text
//! Empty --start--> Pending --response--> Classified
//!                     \------complete---> NoHeaders
//! Classified / NoHeaders --start--> (Empty) --> Pending
//! ```
//!
//! Callers pass only main-frame events; frame filtering happens at the event
//! boundary.

use std::collections::{HashMap, VecDeque};

use log::{debug, info};

use crate::config::RECENTLY_CLOSED_TABS;
use crate::fingerprint::{classify, HeaderSet};
use crate::session::models::{PendingNavigation, PerformanceMetrics, TabId, TabSession, TabState};

/// What a registry operation did to a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Prior session deleted, navigation pending.
    Cleared,
    /// Session created or replaced from a response.
    Classified,
    /// Same response observed again (e.g. fallback event); nothing changed.
    Unchanged,
    /// Event for a tab with no navigation and no session, or for a tab that
    /// was just closed; dropped.
    Dropped,
    /// Navigation completed without a response event.
    NoHeaders,
    /// Navigation completed; session URL updated to the final URL.
    UrlRefreshed,
    /// Navigation completed; session already up to date.
    Completed,
    /// Performance payload attached to a session.
    PerformanceAttached,
    /// All per-tab state removed.
    Closed,
}

impl Transition {
    /// Whether the tab's snapshot changed and observers must be told.
    pub fn notifies(&self) -> bool {
        matches!(
            self,
            Transition::Cleared
                | Transition::Classified
                | Transition::NoHeaders
                | Transition::UrlRefreshed
                | Transition::PerformanceAttached
        )
    }
}

/// Registry of per-tab sessions and pending navigations.
///
/// Constructed once per process and passed by reference to event handlers;
/// tests build isolated instances.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<TabId, TabSession>,
    pending: HashMap<TabId, PendingNavigation>,
    recently_closed: VecDeque<TabId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main-frame navigation started: drop the old document's session and
    /// open a pending navigation.
    pub fn navigation_started(&mut self, tab_id: TabId, url: &str) -> Transition {
        self.recently_closed.retain(|closed| *closed != tab_id);
        self.sessions.remove(&tab_id);
        self.pending.insert(tab_id, PendingNavigation::new(url));
        debug!("Tab {tab_id}: navigation started to {url}");
        Transition::Cleared
    }

    /// Main-document response observed.
    ///
    /// Builds the session from the response and classifies it. A response for a
    /// tab with neither a pending navigation nor a session (closed tab, or a
    /// tab that never navigated while we were running) is dropped.
    pub fn response_observed(&mut self, tab_id: TabId, url: &str, headers: HeaderSet) -> Transition {
        let existing = self.sessions.get(&tab_id);
        match self.pending.get_mut(&tab_id) {
            Some(pending) => pending.headers_received = true,
            None if existing.is_none() => {
                debug!("Tab {tab_id}: dropping response for {url} (no navigation)");
                return Transition::Dropped;
            }
            None => {}
        }

        let classification = classify(&headers);

        // The fallback event type may report the same response a second time.
        // Compare against the response URL: `url` may already hold the final
        // URL after a redirect.
        if let Some(session) = existing {
            if !session.no_headers
                && session.response_url.as_deref() == Some(url)
                && session.headers == headers
                && session.classification == classification
            {
                return Transition::Unchanged;
            }
        }

        // Performance data can arrive before the response; it belongs to the
        // same document because navigation start already dropped older state.
        let performance = self
            .sessions
            .remove(&tab_id)
            .and_then(|previous| previous.performance);

        let mut session = TabSession::classified(url, headers, classification);
        session.performance = performance;
        debug!(
            "Tab {tab_id}: classified {url} as cdn={:?} status={:?}",
            session.classification.cdn, session.classification.status
        );
        self.sessions.insert(tab_id, session);
        Transition::Classified
    }

    /// Main-frame navigation completed.
    ///
    /// If no response event fired since navigation start, the session is
    /// flagged `no_headers` (created if missing). Otherwise only the URL is
    /// refreshed to the final URL after redirects; the classification is kept.
    pub fn navigation_completed(&mut self, tab_id: TabId, url: &str) -> Transition {
        let pending = self.pending.remove(&tab_id);

        if matches!(pending, Some(ref p) if !p.headers_received) {
            let session = self
                .sessions
                .entry(tab_id)
                .or_insert_with(|| TabSession::minimal(url));
            session.url = url.to_string();
            session.no_headers = true;
            session.touch();
            info!("Tab {tab_id}: navigation to {url} completed without response headers");
            return Transition::NoHeaders;
        }

        match self.sessions.get_mut(&tab_id) {
            Some(session) if session.url != url => {
                debug!("Tab {tab_id}: final URL {} -> {url}", session.url);
                session.url = url.to_string();
                session.touch();
                Transition::UrlRefreshed
            }
            _ => Transition::Completed,
        }
    }

    /// Page collector delivered performance metrics for a tab.
    ///
    /// Merges onto the existing session without touching its classification,
    /// or creates a minimal session holding only the URL and the metrics.
    /// Metrics for a recently closed tab are dropped.
    pub fn performance_received(
        &mut self,
        tab_id: TabId,
        url: &str,
        metrics: PerformanceMetrics,
    ) -> Transition {
        if self.recently_closed.contains(&tab_id) {
            debug!("Tab {tab_id}: dropping performance data for closed tab");
            return Transition::Dropped;
        }
        let session = self
            .sessions
            .entry(tab_id)
            .or_insert_with(|| TabSession::minimal(url));
        session.performance = Some(metrics);
        session.touch();
        Transition::PerformanceAttached
    }

    /// Tab closed: remove everything held for it.
    pub fn tab_closed(&mut self, tab_id: TabId) -> Transition {
        self.sessions.remove(&tab_id);
        self.pending.remove(&tab_id);
        if !self.recently_closed.contains(&tab_id) {
            if self.recently_closed.len() == RECENTLY_CLOSED_TABS {
                self.recently_closed.pop_front();
            }
            self.recently_closed.push_back(tab_id);
        }
        Transition::Closed
    }

    pub fn session(&self, tab_id: TabId) -> Option<&TabSession> {
        self.sessions.get(&tab_id)
    }

    /// Owned copy of the current session, as pushed to observers.
    pub fn snapshot(&self, tab_id: TabId) -> Option<TabSession> {
        self.sessions.get(&tab_id).cloned()
    }

    pub fn pending(&self, tab_id: TabId) -> Option<&PendingNavigation> {
        self.pending.get(&tab_id)
    }

    pub fn state(&self, tab_id: TabId) -> TabState {
        let session = self.sessions.get(&tab_id);
        if session.is_some_and(|s| s.no_headers) {
            return TabState::NoHeaders;
        }
        if self.pending.get(&tab_id).is_some_and(|p| !p.headers_received) {
            return TabState::Pending;
        }
        if session.is_some() {
            TabState::Classified
        } else {
            TabState::Empty
        }
    }

    /// Number of tabs with a session.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops all state (process teardown).
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.pending.clear();
        self.recently_closed.clear();
    }
}
