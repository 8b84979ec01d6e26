//! # Error Types
//!
//! Defines error types shared across the workspace.

use thiserror::Error;

use crate::message::MailboxId;

/// Errors that can occur while enqueuing a message into a mailbox.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// A reject-policy mailbox was at capacity.
    #[error("Mailbox {mailbox} full: capacity {capacity} reached")]
    MailboxFull { mailbox: MailboxId, capacity: usize },

    /// The mailbox was dropped while still registered.
    #[error("Mailbox {mailbox} closed: dropped while still registered")]
    Closed { mailbox: MailboxId },
}

impl DeliveryError {
    /// Identity of the mailbox the delivery failed on.
    #[must_use]
    pub fn mailbox(&self) -> MailboxId {
        match self {
            DeliveryError::MailboxFull { mailbox, .. } | DeliveryError::Closed { mailbox } => {
                *mailbox
            }
        }
    }
}
