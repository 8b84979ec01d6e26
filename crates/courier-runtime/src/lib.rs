//! # Courier Demo Runtime
//!
//! Producer, Consumer, and Pipeline-Stage roles as spawned tasks over a
//! shared [`MessageBus`](courier_bus::MessageBus), plus the demonstration
//! scenarios the binary runs. The roles are deliberately thin clients: all
//! routing, ordering, and backpressure behavior lives in `courier-bus`.
//!
//! Every spawned role returns a `JoinHandle` and is awaited before its
//! scenario returns; nothing is fire-and-forget.

pub mod config;
pub mod roles;
pub mod scenarios;

pub use config::RuntimeConfig;
pub use roles::{Consumer, ConsumerReport, PipelineStage, Producer};
