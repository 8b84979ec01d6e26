//! Stream adapter over a mailbox, for use with stream combinators.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio_stream::Stream;

use courier_types::{MailboxId, Message};

use crate::mailbox::Mailbox;

/// A [`Stream`] of messages drained from an owned mailbox.
///
/// The mailbox keeps its own prototype sender alive, so the stream pends
/// while the queue is empty rather than terminating; consumers that need a
/// bounded wait should keep using [`Mailbox::recv`] directly.
#[derive(Debug)]
pub struct MessageStream {
    mailbox: Mailbox,
}

impl MessageStream {
    /// Wrap an owned mailbox.
    #[must_use]
    pub fn new(mailbox: Mailbox) -> Self {
        Self { mailbox }
    }

    /// Identity of the underlying mailbox.
    #[must_use]
    pub fn id(&self) -> MailboxId {
        self.mailbox.id()
    }

    /// Recover the mailbox.
    #[must_use]
    pub fn into_inner(self) -> Mailbox {
        self.mailbox
    }
}

impl Stream for MessageStream {
    type Item = Message;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.mailbox.poll_recv(cx)
    }
}
