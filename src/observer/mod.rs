//! Push updates to popup subscribers.
//!
//! Each tab has at most one subscriber (the popup's long-lived connection).
//! Subscribing delivers the current snapshot immediately; afterwards every
//! change to that tab's session is pushed as `{type: "update", data}`. Sends
//! never block and never fail the caller: a subscriber whose receiver is gone
//! is dropped from the hub.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error_handling::ChannelError;
use crate::session::{TabId, TabSession};

/// Message pushed to a subscriber.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObserverMessage {
    Update { data: Option<TabSession> },
}

impl ObserverMessage {
    pub fn data(&self) -> Option<&TabSession> {
        match self {
            ObserverMessage::Update { data } => data.as_ref(),
        }
    }
}

/// Identifies one subscription so a stale disconnect cannot remove its
/// replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    tx: mpsc::UnboundedSender<ObserverMessage>,
}

/// Tab id to current subscriber.
#[derive(Default)]
pub struct ObserverHub {
    subscribers: HashMap<TabId, Subscriber>,
    next_id: u64,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tx` as the subscriber for `tab_id` and sends it `snapshot`.
    ///
    /// Replaces any earlier subscriber for the same tab.
    pub fn subscribe(
        &mut self,
        tab_id: TabId,
        tx: mpsc::UnboundedSender<ObserverMessage>,
        snapshot: Option<TabSession>,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        if self
            .subscribers
            .insert(tab_id, Subscriber { id, tx })
            .is_some()
        {
            log::debug!("Tab {tab_id}: replacing previous subscriber");
        }
        // A receiver dropped before the first message simply unsubscribes.
        let _ = self.notify(tab_id, snapshot);
        id
    }

    /// Removes the subscription if it is still the current one for the tab.
    pub fn unsubscribe(&mut self, tab_id: TabId, id: SubscriptionId) -> bool {
        if self.subscribers.get(&tab_id).is_some_and(|s| s.id == id) {
            self.subscribers.remove(&tab_id);
            true
        } else {
            false
        }
    }

    /// Removes whatever subscription the tab has (tab closed).
    pub fn remove_tab(&mut self, tab_id: TabId) {
        self.subscribers.remove(&tab_id);
    }

    /// Pushes a snapshot to the tab's subscriber, if any.
    ///
    /// Returns `Ok(false)` when nobody is subscribed. A closed receiver is
    /// removed and reported as [`ChannelError::Closed`].
    pub fn notify(
        &mut self,
        tab_id: TabId,
        snapshot: Option<TabSession>,
    ) -> Result<bool, ChannelError> {
        let Some(subscriber) = self.subscribers.get(&tab_id) else {
            return Ok(false);
        };
        match subscriber.tx.send(ObserverMessage::Update { data: snapshot }) {
            Ok(()) => Ok(true),
            Err(_) => {
                self.subscribers.remove(&tab_id);
                Err(ChannelError::Closed(tab_id))
            }
        }
    }

    pub fn is_subscribed(&self, tab_id: TabId) -> bool {
        self.subscribers.contains_key(&tab_id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
