//! # Message Bus
//!
//! The central router. Owns the subscription registry and the publish
//! counter; `publish` fans a message out into every mailbox registered for
//! its kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use courier_types::{DeliveryError, MailboxId, Message, MessageKind};

use crate::mailbox::Mailbox;
use crate::registry::SubscriptionRegistry;

/// Errors surfaced to a publisher.
#[derive(Debug, Error)]
pub enum PublishError {
    /// At least one registered mailbox refused the message. Fan-out still
    /// reached every other mailbox in the lane, in order; `failures` lists
    /// one entry per refusing mailbox.
    #[error("Incomplete fan-out on {kind}: only {delivered} subscriber(s) reached")]
    Delivery {
        kind: MessageKind,
        delivered: usize,
        failures: Vec<DeliveryError>,
    },
}

/// Trait for publishing messages to a bus.
///
/// This is the seam producer and pipeline roles hold, so a stage can feed a
/// different bus than the one it consumes from.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a message, returning the number of mailboxes it reached.
    async fn publish(&self, message: Message) -> Result<usize, PublishError>;

    /// Total number of publish calls accepted so far.
    fn total_published(&self) -> u64;
}

/// A consistent view of the bus for diagnostics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BusStats {
    /// Bus name.
    pub bus: String,
    /// Publishes accepted since construction.
    pub total_published: u64,
    /// Current subscriber count per kind.
    pub subscribers: HashMap<MessageKind, usize>,
}

/// Central publish/subscribe router.
///
/// Delivery contract, per kind: every publish locks the kind's registry lane,
/// takes its sequence number, and enqueues into each registered mailbox in
/// registration order before releasing the lane. Publishers of the same kind
/// therefore serialize, and every subscriber of the kind observes the same
/// message order. Publishers of different kinds never contend.
#[derive(Debug)]
pub struct MessageBus {
    name: String,
    registry: SubscriptionRegistry,
    published: AtomicU64,
}

impl MessageBus {
    /// Create a bus with a lane pre-allocated for every message kind.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: SubscriptionRegistry::new(),
            published: AtomicU64::new(0),
        }
    }

    /// This bus's name, used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `mailbox` for `kind`. Duplicate registrations are no-ops.
    ///
    /// Returns `true` when the mailbox was newly registered.
    pub async fn subscribe(&self, kind: MessageKind, mailbox: &Mailbox) -> bool {
        let added = self.registry.subscribe(kind, mailbox.handle()).await;
        if added {
            debug!(
                bus = %self.name,
                kind = %kind,
                mailbox = %mailbox.id(),
                "subscriber registered"
            );
        }
        added
    }

    /// Remove the registration of the mailbox identified by `id` for
    /// `kind`, if any.
    ///
    /// Once this returns, no later publish delivers to that mailbox for this
    /// kind. Taking the identity rather than the mailbox lets a consumer
    /// close its mailbox first and deregister after, releasing any publisher
    /// still blocked on the queue before this call contends for the lane.
    pub async fn unsubscribe(&self, kind: MessageKind, id: MailboxId) -> bool {
        let removed = self.registry.unsubscribe(kind, id).await;
        if removed {
            debug!(
                bus = %self.name,
                kind = %kind,
                mailbox = %id,
                "subscriber removed"
            );
        }
        removed
    }

    /// Publish a message to every mailbox currently registered for its kind.
    ///
    /// Returns the number of mailboxes the message was enqueued into; zero
    /// subscribers is a normal outcome, not an error. The call returns only
    /// after every enqueue: a full block-policy mailbox makes it wait, so
    /// slow consumers throttle their producers rather than losing messages.
    /// Refusals from reject-policy or dropped mailboxes are collected and
    /// surfaced as [`PublishError::Delivery`] after the remaining mailboxes
    /// have been served.
    pub async fn publish(&self, message: Message) -> Result<usize, PublishError> {
        let kind = message.kind();
        // The lane guard is the critical section: sequence number and
        // dispatch order for this kind are fixed while it is held.
        let lane = self.registry.dispatch_lane(kind).await;
        let seq = self.published.fetch_add(1, Ordering::SeqCst) + 1;

        let mut delivered = 0usize;
        let mut failures = Vec::new();
        for handle in lane.iter() {
            match handle.deliver(message.clone()).await {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(
                        bus = %self.name,
                        seq,
                        kind = %kind,
                        mailbox = %err.mailbox(),
                        error = %err,
                        "delivery refused"
                    );
                    failures.push(err);
                }
            }
        }

        debug!(
            bus = %self.name,
            seq,
            kind = %kind,
            sender = message.sender(),
            recipients = delivered,
            "message published"
        );

        if failures.is_empty() {
            Ok(delivered)
        } else {
            Err(PublishError::Delivery {
                kind,
                delivered,
                failures,
            })
        }
    }

    /// Publishes accepted since construction.
    #[must_use]
    pub fn total_published(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    /// Subscriber counts per kind plus the publish total.
    ///
    /// Each kind's count is read under its lane lock, never mid-mutation.
    pub async fn stats(&self) -> BusStats {
        let mut subscribers = HashMap::with_capacity(MessageKind::ALL.len());
        for kind in MessageKind::ALL {
            subscribers.insert(kind, self.registry.subscriber_count(kind).await);
        }
        BusStats {
            bus: self.name.clone(),
            total_published: self.total_published(),
            subscribers,
        }
    }
}

#[async_trait]
impl MessagePublisher for MessageBus {
    async fn publish(&self, message: Message) -> Result<usize, PublishError> {
        MessageBus::publish(self, message).await
    }

    fn total_published(&self) -> u64 {
        MessageBus::total_published(self)
    }
}
