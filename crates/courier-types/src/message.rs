//! # Message Entities
//!
//! The message record, its kind enumeration, and mailbox identity.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of message categories routed by the bus.
///
/// The set is fixed at compile time; the subscription registry pre-allocates
/// a lane for every member, so kind lookups can never fail at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Order placement and fulfilment events.
    Order,
    /// Payment processing events.
    Payment,
    /// Stock level and reservation events.
    Inventory,
    /// Carrier and delivery events.
    Shipping,
    /// User-facing notification events.
    Notification,
}

impl MessageKind {
    /// Every member of the kind set, in declaration order.
    pub const ALL: [MessageKind; 5] = [
        MessageKind::Order,
        MessageKind::Payment,
        MessageKind::Inventory,
        MessageKind::Shipping,
        MessageKind::Notification,
    ];

    /// Human-readable label, kept apart from the tag's identity.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Order => "order",
            MessageKind::Payment => "payment",
            MessageKind::Inventory => "inventory",
            MessageKind::Shipping => "shipping",
            MessageKind::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unique identity of a mailbox registration.
///
/// The registry keys idempotent subscribe and unsubscribe on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MailboxId(Uuid);

impl MailboxId {
    /// Mint a fresh mailbox identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MailboxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An immutable record of a typed payload, its origin, and creation time.
///
/// `created_at_ms` is wall-clock time at construction and is carried for
/// observability only; delivery ordering is defined by publish sequence,
/// never by this timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    kind: MessageKind,
    content: String,
    sender: String,
    created_at_ms: u64,
}

impl Message {
    /// Build a message stamped with the current wall-clock time.
    #[must_use]
    pub fn new(kind: MessageKind, content: impl Into<String>, sender: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            sender: sender.into(),
            created_at_ms: now_ms(),
        }
    }

    /// The message's kind tag.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// The payload text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Name of the producer that built this message.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Wall-clock construction time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.label(), self.sender, self.content)
    }
}

/// Current wall-clock time in milliseconds.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
