//! # Mailbox
//!
//! A bounded or unbounded FIFO queue of messages, one per subscriber
//! registration. The subscriber creates the mailbox and owns the draining
//! side; the bus only ever holds [`MailboxHandle`]s cloned off it for
//! delivery, and never reads or drains the queue itself.

use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time::timeout;

use courier_types::{DeliveryError, MailboxId, Message};

/// Queue capacity, with an explicit sentinel for "unbounded".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// No limit; delivery never waits and never rejects.
    Unbounded,
    /// At most this many undrained messages.
    Bounded(usize),
}

impl Capacity {
    /// The bound, if one exists.
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Capacity::Bounded(limit) => Some(limit),
            Capacity::Unbounded => None,
        }
    }
}

/// What delivery does when a bounded mailbox is full.
///
/// The policy is fixed at mailbox construction; callers choose it explicitly
/// rather than the bus guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Delivery waits until the consumer frees space. Backpressure reaches
    /// the publisher.
    #[default]
    Block,
    /// Delivery fails immediately with
    /// [`DeliveryError::MailboxFull`].
    Reject,
}

/// Sending half of a mailbox channel.
#[derive(Debug, Clone)]
enum SenderSlot {
    Bounded {
        tx: mpsc::Sender<Message>,
        capacity: usize,
    },
    Unbounded(mpsc::UnboundedSender<Message>),
}

/// Receiving half of a mailbox channel.
#[derive(Debug)]
enum ReceiverSlot {
    Bounded(mpsc::Receiver<Message>),
    Unbounded(mpsc::UnboundedReceiver<Message>),
}

impl ReceiverSlot {
    async fn recv(&mut self) -> Option<Message> {
        match self {
            ReceiverSlot::Bounded(rx) => rx.recv().await,
            ReceiverSlot::Unbounded(rx) => rx.recv().await,
        }
    }

    fn try_recv(&mut self) -> Option<Message> {
        match self {
            ReceiverSlot::Bounded(rx) => rx.try_recv().ok(),
            ReceiverSlot::Unbounded(rx) => rx.try_recv().ok(),
        }
    }

    fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        match self {
            ReceiverSlot::Bounded(rx) => rx.poll_recv(cx),
            ReceiverSlot::Unbounded(rx) => rx.poll_recv(cx),
        }
    }
}

/// Delivery handle held by the subscription registry.
///
/// Cloning is cheap; every clone refers to the same underlying queue and
/// carries the mailbox identity the registry keys subscriptions on.
#[derive(Debug, Clone)]
pub struct MailboxHandle {
    id: MailboxId,
    policy: OverflowPolicy,
    slot: SenderSlot,
}

impl MailboxHandle {
    /// Identity of the mailbox this handle delivers into.
    #[must_use]
    pub fn id(&self) -> MailboxId {
        self.id
    }

    /// Overflow policy fixed at mailbox construction.
    #[must_use]
    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Enqueue a message.
    ///
    /// Block-policy mailboxes make this wait while the queue is full, so
    /// backpressure propagates to the caller. Reject-policy mailboxes fail
    /// fast with [`DeliveryError::MailboxFull`] instead. Delivering into a
    /// mailbox that was dropped while still registered yields
    /// [`DeliveryError::Closed`].
    pub async fn deliver(&self, message: Message) -> Result<(), DeliveryError> {
        match (&self.slot, self.policy) {
            (SenderSlot::Unbounded(tx), _) => tx
                .send(message)
                .map_err(|_| DeliveryError::Closed { mailbox: self.id }),
            (SenderSlot::Bounded { tx, .. }, OverflowPolicy::Block) => tx
                .send(message)
                .await
                .map_err(|_| DeliveryError::Closed { mailbox: self.id }),
            (SenderSlot::Bounded { tx, capacity }, OverflowPolicy::Reject) => {
                tx.try_send(message).map_err(|err| match err {
                    TrySendError::Full(_) => DeliveryError::MailboxFull {
                        mailbox: self.id,
                        capacity: *capacity,
                    },
                    TrySendError::Closed(_) => DeliveryError::Closed { mailbox: self.id },
                })
            }
        }
    }
}

/// Per-subscriber FIFO queue of messages.
///
/// The mailbox keeps one prototype sender of its own, so its channel cannot
/// close while the mailbox is alive: a `None` from [`Mailbox::recv`] always
/// means the wait window elapsed with the queue empty, never "closed".
#[derive(Debug)]
pub struct Mailbox {
    id: MailboxId,
    capacity: Capacity,
    handle: MailboxHandle,
    rx: ReceiverSlot,
}

impl Mailbox {
    /// Create a mailbox with the default [`OverflowPolicy::Block`] policy.
    #[must_use]
    pub fn new(capacity: Capacity) -> Self {
        Self::with_policy(capacity, OverflowPolicy::Block)
    }

    /// Create a mailbox with an explicit overflow policy.
    #[must_use]
    pub fn with_policy(capacity: Capacity, policy: OverflowPolicy) -> Self {
        let id = MailboxId::new();
        let (slot, rx) = match capacity {
            Capacity::Bounded(limit) => {
                // tokio channels require a capacity of at least 1.
                let (tx, rx) = mpsc::channel(limit.max(1));
                (
                    SenderSlot::Bounded {
                        tx,
                        capacity: limit.max(1),
                    },
                    ReceiverSlot::Bounded(rx),
                )
            }
            Capacity::Unbounded => {
                let (tx, rx) = mpsc::unbounded_channel();
                (SenderSlot::Unbounded(tx), ReceiverSlot::Unbounded(rx))
            }
        };
        Self {
            id,
            capacity,
            handle: MailboxHandle { id, policy, slot },
            rx,
        }
    }

    /// This mailbox's identity.
    #[must_use]
    pub fn id(&self) -> MailboxId {
        self.id
    }

    /// Capacity fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Overflow policy fixed at construction.
    #[must_use]
    pub fn policy(&self) -> OverflowPolicy {
        self.handle.policy()
    }

    /// Clone a delivery handle for registration with a bus.
    #[must_use]
    pub fn handle(&self) -> MailboxHandle {
        self.handle.clone()
    }

    /// Dequeue the oldest message, waiting up to `wait`.
    ///
    /// `None` signals an empty window; it is a loop-continuation outcome for
    /// the consumer, not an error.
    pub async fn recv(&mut self, wait: Duration) -> Option<Message> {
        match timeout(wait, self.rx.recv()).await {
            Ok(received) => received,
            Err(_) => None,
        }
    }

    /// Dequeue the oldest message without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv()
    }

    pub(crate) fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<Message>> {
        self.rx.poll_recv(cx)
    }
}
