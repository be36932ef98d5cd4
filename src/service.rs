//! The background process: routes inbound events to the registry, observers
//! and badge surface.
//!
//! [`BackgroundService`] is constructed once and fed events strictly in the
//! order the browser delivers them. Handling an event never waits on a
//! subscriber or on the badge surface; both are fire-and-forget.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc;

use crate::badge::{apply_badge, BadgeSink, BadgeState};
use crate::display::PopupView;
use crate::error_handling::{EventKind, EventStats, FailureKind};
use crate::events::{
    InboundEvent, MessageReply, RequestType, ResponseDetails, RuntimeMessage, SenderTab,
    WINDOW_ID_NONE,
};
use crate::observer::{ObserverHub, ObserverMessage, SubscriptionId};
use crate::session::{
    FrameId, PerformanceMetrics, SessionRegistry, TabId, TabSession, Transition, WindowId,
    MAIN_FRAME_ID,
};
use crate::theme::{SharedTheme, Theme};

/// A popup connection opened by a `subscribe` handshake.
#[derive(Debug)]
pub struct Subscription {
    pub tab_id: TabId,
    pub id: SubscriptionId,
    pub receiver: mpsc::UnboundedReceiver<ObserverMessage>,
}

/// What handling an event produced for the caller.
#[derive(Debug)]
pub enum EventOutcome {
    /// Response to a runtime message.
    Reply(MessageReply),
    /// A subscriber was attached; its receiver already holds the snapshot.
    Subscribed(Subscription),
}

pub struct BackgroundService {
    registry: SessionRegistry,
    observers: ObserverHub,
    badge: Box<dyn BadgeSink + Send>,
    per_tab_badges: bool,
    theme: SharedTheme,
    stats: Arc<EventStats>,
    active_tabs: HashMap<WindowId, TabId>,
    focused_tab: Option<TabId>,
}

impl BackgroundService {
    pub fn new(
        badge: Box<dyn BadgeSink + Send>,
        per_tab_badges: bool,
        theme: SharedTheme,
        stats: Arc<EventStats>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(),
            observers: ObserverHub::new(),
            badge,
            per_tab_badges,
            theme,
            stats,
            active_tabs: HashMap::new(),
            focused_tab: None,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &EventStats {
        &self.stats
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    /// Tab whose badge is currently shown, if known.
    pub fn focused_tab(&self) -> Option<TabId> {
        self.focused_tab
    }

    pub fn handle_event(&mut self, event: InboundEvent) -> Option<EventOutcome> {
        match event {
            InboundEvent::NavigationStart {
                tab_id,
                frame_id,
                url,
            } => {
                if !self.is_main_frame(frame_id) {
                    return None;
                }
                self.stats.increment_event(EventKind::NavigationStarted);
                let transition = self.registry.navigation_started(tab_id, &url);
                self.after_transition(tab_id, transition);
                None
            }
            InboundEvent::NavigationComplete {
                tab_id,
                frame_id,
                url,
            } => {
                if !self.is_main_frame(frame_id) {
                    return None;
                }
                self.stats.increment_event(EventKind::NavigationCompleted);
                let transition = self.registry.navigation_completed(tab_id, &url);
                match transition {
                    Transition::NoHeaders => {
                        self.stats.increment_event(EventKind::NoHeadersFallback)
                    }
                    Transition::UrlRefreshed => {
                        self.stats.increment_event(EventKind::RedirectUrlUpdated)
                    }
                    _ => {}
                }
                self.after_transition(tab_id, transition);
                None
            }
            InboundEvent::ResponseHeaders(details) | InboundEvent::ResponseStarted(details) => {
                self.handle_response(details);
                None
            }
            InboundEvent::TabClosed { tab_id } => {
                self.stats.increment_event(EventKind::TabClosed);
                self.registry.tab_closed(tab_id);
                self.observers.remove_tab(tab_id);
                self.active_tabs.retain(|_, active| *active != tab_id);
                if self.focused_tab == Some(tab_id) {
                    self.focused_tab = None;
                }
                debug!("Tab {tab_id}: closed, state purged");
                None
            }
            InboundEvent::TabActivated { tab_id, window_id } => {
                if let Some(window_id) = window_id {
                    self.active_tabs.insert(window_id, tab_id);
                }
                self.focused_tab = Some(tab_id);
                self.stats.increment_event(EventKind::BadgeRefreshed);
                self.render_badge(tab_id);
                None
            }
            InboundEvent::WindowFocusChanged { window_id } => {
                if window_id == WINDOW_ID_NONE {
                    return None;
                }
                match self.active_tabs.get(&window_id).copied() {
                    Some(tab_id) => {
                        self.focused_tab = Some(tab_id);
                        self.stats.increment_event(EventKind::BadgeRefreshed);
                        self.render_badge(tab_id);
                    }
                    None => debug!("Window {window_id}: focused, active tab unknown"),
                }
                None
            }
            InboundEvent::Message { message, sender } => self
                .handle_message(message, sender)
                .map(EventOutcome::Reply),
            InboundEvent::Subscribe { tab_id } => {
                Some(EventOutcome::Subscribed(self.subscribe(tab_id)))
            }
            InboundEvent::Disconnect { tab_id } => {
                if self.observers.is_subscribed(tab_id) {
                    self.observers.remove_tab(tab_id);
                    self.stats.increment_event(EventKind::SubscriberDetached);
                }
                None
            }
        }
    }

    /// Attaches a subscriber for `tab_id`; the current snapshot is already
    /// queued on the returned receiver.
    pub fn subscribe(&mut self, tab_id: TabId) -> Subscription {
        let (tx, receiver) = mpsc::unbounded_channel();
        let id = self
            .observers
            .subscribe(tab_id, tx, self.registry.snapshot(tab_id));
        self.stats.increment_event(EventKind::SubscriberAttached);
        debug!("Tab {tab_id}: subscriber attached");
        Subscription {
            tab_id,
            id,
            receiver,
        }
    }

    /// Detaches a subscriber unless it was already replaced.
    pub fn disconnect(&mut self, tab_id: TabId, id: SubscriptionId) -> bool {
        let removed = self.observers.unsubscribe(tab_id, id);
        if removed {
            self.stats.increment_event(EventKind::SubscriberDetached);
        }
        removed
    }

    /// Current snapshot for a tab, as answered to `getTabData`.
    pub fn tab_data(&self, tab_id: TabId) -> Option<TabSession> {
        self.registry.snapshot(tab_id)
    }

    /// Drops all per-tab state and subscribers.
    pub fn shutdown(&mut self) {
        self.registry.clear();
        self.observers = ObserverHub::new();
        self.active_tabs.clear();
        self.focused_tab = None;
    }

    fn handle_response(&mut self, details: ResponseDetails) {
        if details.request_type != RequestType::MainFrame {
            self.stats.increment_event(EventKind::IgnoredSubFrame);
            return;
        }
        if !self.is_main_frame(details.frame_id) {
            return;
        }
        let headers = details.header_set();
        let tab_id = details.tab_id;
        let transition = self
            .registry
            .response_observed(tab_id, &details.url, headers);
        let kind = match transition {
            Transition::Classified => EventKind::ResponseClassified,
            Transition::Unchanged => EventKind::DuplicateResponse,
            _ => EventKind::ResponseDropped,
        };
        self.stats.increment_event(kind);
        self.after_transition(tab_id, transition);
    }

    fn handle_message(
        &mut self,
        message: RuntimeMessage,
        sender: Option<SenderTab>,
    ) -> Option<MessageReply> {
        match message {
            RuntimeMessage::GetTabData { tab_id } => {
                self.stats.increment_event(EventKind::TabDataQueried);
                let data = self.tab_data(tab_id);
                let popup = PopupView::for_session(data.as_ref());
                Some(MessageReply::TabData {
                    tab_id,
                    data,
                    popup,
                })
            }
            RuntimeMessage::PerformanceData { metrics } => {
                match sender {
                    Some(sender) => self.attach_performance(sender, metrics),
                    None => debug!("Performance data without a sender tab ignored"),
                }
                None
            }
            RuntimeMessage::ColorScheme { is_dark } => {
                self.stats.increment_event(EventKind::ColorSchemeChanged);
                let theme = Theme::from_is_dark(is_dark);
                if self.theme.set(theme) {
                    debug!("Color scheme changed to {}", theme.as_str());
                    let target = sender.map(|s| s.id).or(self.focused_tab);
                    if let Some(tab_id) = target {
                        self.render_badge(tab_id);
                    }
                }
                None
            }
        }
    }

    fn attach_performance(&mut self, sender: SenderTab, metrics: PerformanceMetrics) {
        let transition = self
            .registry
            .performance_received(sender.id, &sender.url, metrics);
        if transition == Transition::PerformanceAttached {
            self.stats.increment_event(EventKind::PerformanceAttached);
        }
        self.after_transition(sender.id, transition);
    }

    /// Pushes the tab's snapshot to its subscriber and refreshes the badge
    /// when the transition changed what either shows.
    fn after_transition(&mut self, tab_id: TabId, transition: Transition) {
        if transition.notifies() {
            let snapshot = self.registry.snapshot(tab_id);
            if let Err(e) = self.observers.notify(tab_id, snapshot) {
                debug!("Observer push dropped: {e}");
                self.stats.increment_failure(FailureKind::ObserverPushDropped);
            }
        }
        if matches!(
            transition,
            Transition::Cleared | Transition::Classified | Transition::NoHeaders
        ) {
            self.render_badge(tab_id);
        }
    }

    fn render_badge(&mut self, tab_id: TabId) {
        let state = BadgeState::for_session(self.registry.session(tab_id), self.theme.get());
        apply_badge(
            self.badge.as_mut(),
            tab_id,
            &state,
            self.per_tab_badges,
            &self.stats,
        );
    }

    fn is_main_frame(&self, frame_id: FrameId) -> bool {
        if frame_id == MAIN_FRAME_ID {
            true
        } else {
            self.stats.increment_event(EventKind::IgnoredSubFrame);
            false
        }
    }
}
