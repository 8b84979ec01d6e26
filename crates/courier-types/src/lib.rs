//! # Courier Shared Types
//!
//! Domain entities shared across the Courier workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate types are defined here.
//! - **Immutable Messages**: a [`Message`] never changes after construction;
//!   every field is private and reachable through accessors only.
//! - **Closed Kind Set**: [`MessageKind`] is a fixed enumeration known at bus
//!   construction time. Human-readable labels live in a lookup on the enum,
//!   not in the tag's identity, so equality and hashing stay on the tag alone.

pub mod errors;
pub mod message;

pub use errors::DeliveryError;
pub use message::{MailboxId, Message, MessageKind};
