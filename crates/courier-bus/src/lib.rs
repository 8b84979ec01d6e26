//! # Courier Bus - In-Process Publish/Subscribe Core
//!
//! Producers publish typed [`Message`](courier_types::Message)s, the bus fans
//! them out to every mailbox currently registered for that kind, and consumers
//! drain their own mailboxes independently of the dispatch path.
//!
//! ```text
//! ┌──────────────┐                        ┌──────────────┐
//! │  Producer A  │                        │  Consumer X  │
//! │              │    publish()           │  [Mailbox]   │
//! │              │ ──────┐                └──────────────┘
//! └──────────────┘       ▼                        ↑
//!                  ┌──────────────┐               │ deliver
//! ┌──────────────┐ │  MessageBus  │ ──────────────┤
//! │  Producer B  │ │  [Registry]  │ ──────────────┐
//! └──────────────┘ └──────────────┘               │ deliver
//!        │                ▲                       ▼
//!        └────────────────┘                ┌──────────────┐
//!            publish()                     │  Consumer Y  │
//!                                          │  [Mailbox]   │
//!                                          └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **Total order per kind**: all publishes of one kind are serialized
//!   through that kind's registry lane; every subscriber of the kind observes
//!   the same relative order. Cross-kind ordering is unspecified.
//! - **Fan-out completeness**: a publish reaching K registered mailboxes
//!   performs exactly K enqueues, in registration order.
//! - **Backpressure, not loss**: a full block-policy mailbox makes the
//!   publisher wait for space; a full reject-policy mailbox surfaces a
//!   [`DeliveryError`](courier_types::DeliveryError) to the publisher.
//!   Nothing is dropped silently.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod bus;
pub mod mailbox;
pub mod registry;
pub mod stream;

// Re-export main types
pub use bus::{BusStats, MessageBus, MessagePublisher, PublishError};
pub use mailbox::{Capacity, Mailbox, MailboxHandle, OverflowPolicy};
pub use registry::SubscriptionRegistry;
pub use stream::MessageStream;

/// Default capacity for bounded demo mailboxes.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 20;
