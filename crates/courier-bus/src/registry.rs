//! # Subscription Registry
//!
//! Maps each message kind to the ordered list of mailbox handles registered
//! for it. One mutex lane per kind: every mutation and every dispatch
//! iteration for a kind serialize on that lane, while traffic on other kinds
//! proceeds untouched. The map itself is immutable after construction since
//! the kind set is closed.

use std::collections::HashMap;

use tokio::sync::{Mutex, MutexGuard};

use courier_types::{MailboxId, MessageKind};

use crate::mailbox::MailboxHandle;

/// Ordered per-kind subscriber lists.
///
/// Invariants:
/// - a given mailbox appears at most once per kind (idempotent subscribe);
/// - insertion order is preserved and defines dispatch order;
/// - entries leave only through explicit unsubscribe.
#[derive(Debug)]
pub struct SubscriptionRegistry {
    lanes: HashMap<MessageKind, Mutex<Vec<MailboxHandle>>>,
}

impl SubscriptionRegistry {
    /// Create a registry with an empty lane pre-allocated for every kind,
    /// so lookups never fail.
    #[must_use]
    pub fn new() -> Self {
        let lanes = MessageKind::ALL
            .iter()
            .map(|kind| (*kind, Mutex::new(Vec::new())))
            .collect();
        Self { lanes }
    }

    /// Lane lookup. The registry is pre-populated for the whole closed kind
    /// set, so a missing lane is a programming error and fails fast.
    fn lane(&self, kind: MessageKind) -> &Mutex<Vec<MailboxHandle>> {
        self.lanes
            .get(&kind)
            .expect("registry pre-allocates a lane for every message kind")
    }

    /// Register `handle` for `kind` unless its mailbox is already present.
    ///
    /// Returns `true` when the handle was newly added.
    pub async fn subscribe(&self, kind: MessageKind, handle: MailboxHandle) -> bool {
        let mut lane = self.lane(kind).lock().await;
        if lane.iter().any(|existing| existing.id() == handle.id()) {
            return false;
        }
        lane.push(handle);
        true
    }

    /// Remove the mailbox registered under `id` for `kind`, if present.
    ///
    /// Returns `true` when an entry was removed. Once this returns, no later
    /// publish can deliver to that mailbox for this kind.
    pub async fn unsubscribe(&self, kind: MessageKind, id: MailboxId) -> bool {
        let mut lane = self.lane(kind).lock().await;
        match lane.iter().position(|existing| existing.id() == id) {
            Some(index) => {
                lane.remove(index);
                true
            }
            None => false,
        }
    }

    /// A consistent point-in-time copy of the lane for `kind`, in dispatch
    /// order. No partial add or remove is ever visible in the copy.
    pub async fn snapshot(&self, kind: MessageKind) -> Vec<MailboxHandle> {
        self.lane(kind).lock().await.clone()
    }

    /// Number of mailboxes currently registered for `kind`.
    pub async fn subscriber_count(&self, kind: MessageKind) -> usize {
        self.lane(kind).lock().await.len()
    }

    /// Lock a kind's lane for dispatch. Publishing holds this guard across
    /// the whole fan-out, which is what makes the per-kind delivery order
    /// total across all subscribers of the kind.
    pub(crate) async fn dispatch_lane(
        &self,
        kind: MessageKind,
    ) -> MutexGuard<'_, Vec<MailboxHandle>> {
        self.lane(kind).lock().await
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
