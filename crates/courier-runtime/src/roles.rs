//! # Client Roles
//!
//! Producer, Consumer, and Pipeline-Stage roles. Each `spawn` returns a
//! `JoinHandle` the caller must await; role lifecycles are always observed,
//! never detached.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use courier_bus::{Capacity, Mailbox, MessageBus, MessagePublisher, DEFAULT_MAILBOX_CAPACITY};
use courier_types::{Message, MessageKind};

use crate::config::RuntimeConfig;

/// Sleep a random interval in `[0, max]` to spread role activity out.
async fn pace(max: Duration) {
    if max.is_zero() {
        return;
    }
    let jitter_ms = rand::thread_rng().gen_range(0..=max.as_millis() as u64);
    tokio::time::sleep(Duration::from_millis(jitter_ms)).await;
}

/// Publishes `count` messages of one kind to a bus.
#[derive(Debug)]
pub struct Producer {
    name: String,
    kind: MessageKind,
    count: usize,
}

impl Producer {
    /// A producer of `count` messages of `kind`.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MessageKind, count: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            count,
        }
    }

    /// Run the producer as a task; resolves to the number of messages
    /// actually published.
    pub fn spawn(self, bus: Arc<dyn MessagePublisher>, config: &RuntimeConfig) -> JoinHandle<usize> {
        let max_pace = config.max_pace;
        tokio::spawn(async move {
            info!(
                producer = %self.name,
                kind = %self.kind,
                count = self.count,
                "producer started"
            );
            let mut published = 0;
            for i in 1..=self.count {
                pace(max_pace).await;
                let message = Message::new(
                    self.kind,
                    format!("{}-{}", self.kind.label(), i),
                    self.name.as_str(),
                );
                match bus.publish(message).await {
                    Ok(recipients) => {
                        published += 1;
                        debug!(producer = %self.name, recipients, "published");
                    }
                    Err(err) => {
                        warn!(producer = %self.name, error = %err, "publish failed");
                    }
                }
            }
            info!(producer = %self.name, published, "producer finished");
            published
        })
    }
}

/// What a consumer saw by the time it stopped.
#[derive(Debug)]
pub struct ConsumerReport {
    /// Consumer name.
    pub name: String,
    /// Messages drained, in delivery order.
    pub consumed: Vec<Message>,
}

/// Drains one mailbox registered for one or more kinds.
///
/// Stops after `target` messages, or after `idle_limit` consecutive empty
/// receive windows declare it done.
#[derive(Debug)]
pub struct Consumer {
    name: String,
    kinds: Vec<MessageKind>,
    target: usize,
    capacity: Capacity,
}

impl Consumer {
    /// A consumer of `target` messages across `kinds`, with the default
    /// bounded mailbox.
    #[must_use]
    pub fn new(name: impl Into<String>, kinds: Vec<MessageKind>, target: usize) -> Self {
        Self {
            name: name.into(),
            kinds,
            target,
            capacity: Capacity::Bounded(DEFAULT_MAILBOX_CAPACITY),
        }
    }

    /// Override the mailbox capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Create the mailbox, register it, and run the drain loop as a task.
    ///
    /// Registration completes before this returns, so messages published
    /// afterwards are guaranteed to be seen.
    pub async fn spawn(
        self,
        bus: &Arc<MessageBus>,
        config: &RuntimeConfig,
    ) -> JoinHandle<ConsumerReport> {
        let mut mailbox = Mailbox::new(self.capacity);
        for kind in &self.kinds {
            bus.subscribe(*kind, &mailbox).await;
        }

        let bus = bus.clone();
        let recv_window = config.recv_window;
        let idle_limit = config.idle_limit;
        let max_pace = config.max_pace;
        tokio::spawn(async move {
            let labels: Vec<_> = self.kinds.iter().map(|kind| kind.label()).collect();
            info!(consumer = %self.name, kinds = ?labels, "consumer started");

            let mut consumed = Vec::new();
            let mut idle_windows = 0;
            while consumed.len() < self.target && idle_windows < idle_limit {
                match mailbox.recv(recv_window).await {
                    Some(message) => {
                        idle_windows = 0;
                        pace(max_pace).await;
                        debug!(consumer = %self.name, message = %message, "consumed");
                        consumed.push(message);
                    }
                    None => {
                        idle_windows += 1;
                        debug!(consumer = %self.name, idle_windows, "waiting for messages");
                    }
                }
            }

            // Close the mailbox before deregistering: a publisher blocked on
            // this queue gets released by the close, so the unsubscribe can
            // take the lane without waiting on it.
            let id = mailbox.id();
            drop(mailbox);
            for kind in &self.kinds {
                bus.unsubscribe(*kind, id).await;
            }

            info!(consumer = %self.name, consumed = consumed.len(), "consumer finished");
            ConsumerReport {
                name: self.name,
                consumed,
            }
        })
    }
}

/// A consumer that republishes a derived message of another kind for each
/// message it drains, chaining buses into a processing graph.
#[derive(Debug)]
pub struct PipelineStage {
    name: String,
    input: MessageKind,
    output: MessageKind,
    target: usize,
}

impl PipelineStage {
    /// A stage turning `input` messages into derived `output` messages.
    ///
    /// # Panics
    ///
    /// A stage consuming its own output kind would deadlock against a full
    /// downstream mailbox, so that wiring is rejected outright.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        input: MessageKind,
        output: MessageKind,
        target: usize,
    ) -> Self {
        assert!(
            input != output,
            "pipeline stage must not consume its own output kind"
        );
        Self {
            name: name.into(),
            input,
            output,
            target,
        }
    }

    /// Register for the input kind on `input_bus` and run the stage as a
    /// task; resolves to the number of messages processed. The output may be
    /// the same bus or a different one.
    pub async fn spawn(
        self,
        input_bus: &Arc<MessageBus>,
        output_bus: Arc<dyn MessagePublisher>,
        config: &RuntimeConfig,
    ) -> JoinHandle<usize> {
        let mut mailbox = Mailbox::new(Capacity::Unbounded);
        input_bus.subscribe(self.input, &mailbox).await;

        let input_bus = input_bus.clone();
        let recv_window = config.recv_window;
        let max_pace = config.max_pace;
        tokio::spawn(async move {
            info!(
                stage = %self.name,
                input = %self.input,
                output = %self.output,
                "pipeline stage started"
            );

            let mut processed = 0;
            while processed < self.target {
                let Some(message) = mailbox.recv(recv_window).await else {
                    debug!(stage = %self.name, "input dry, stage stopping");
                    break;
                };
                pace(max_pace).await;
                let derived = Message::new(
                    self.output,
                    format!("processed-{}", message.content()),
                    self.name.as_str(),
                );
                match output_bus.publish(derived).await {
                    Ok(_) => processed += 1,
                    Err(err) => {
                        warn!(stage = %self.name, error = %err, "republish failed");
                    }
                }
            }

            input_bus.unsubscribe(self.input, mailbox.id()).await;
            info!(stage = %self.name, processed, "pipeline stage finished");
            processed
        })
    }
}
