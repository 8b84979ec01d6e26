//! # Demonstration Scenarios
//!
//! Three wirings of the same core, in increasing order of traffic shape:
//!
//! 1. `simple` — two producers and two consumers on a single kind.
//! 2. `fanout` — four producers across kinds, four consumers with
//!    overlapping interests sharing one bus.
//! 3. `pipeline` — a chain of stages deriving new kinds from consumed ones:
//!
//! ```text
//! intake ──Order──→ [payment-stage] ──Payment──→ [shipping-stage]
//!                                                      │
//!                                   delivery-desk ←─Shipping
//! ```
//!
//! Every spawned role is joined before the scenario returns.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use courier_bus::{BusStats, MessageBus};
use courier_types::MessageKind;

use crate::config::RuntimeConfig;
use crate::roles::{Consumer, PipelineStage, Producer};

/// Two order services feeding two order workers.
pub async fn simple(config: &RuntimeConfig) -> Result<BusStats> {
    info!("--- scenario: simple ---");
    let bus = Arc::new(MessageBus::new("order-bus"));
    let count = config.messages_per_producer;

    let consumers = vec![
        Consumer::new("order-worker-1", vec![MessageKind::Order], count)
            .spawn(&bus, config)
            .await,
        Consumer::new("order-worker-2", vec![MessageKind::Order], count)
            .spawn(&bus, config)
            .await,
    ];

    let producers = vec![
        Producer::new("order-service-a", MessageKind::Order, count).spawn(bus.clone(), config),
        Producer::new("order-service-b", MessageKind::Order, count).spawn(bus.clone(), config),
    ];

    for producer in producers {
        producer.await.context("producer task failed")?;
    }
    for consumer in consumers {
        let report = consumer.await.context("consumer task failed")?;
        info!(consumer = %report.name, consumed = report.consumed.len(), "drained");
    }

    Ok(bus.stats().await)
}

/// Four producers across kinds and four consumers with overlapping
/// interests, one of them watching four kinds through a single mailbox.
pub async fn fanout(config: &RuntimeConfig) -> Result<BusStats> {
    info!("--- scenario: fanout ---");
    let bus = Arc::new(MessageBus::new("commerce-bus"));
    let count = config.messages_per_producer;

    let consumers = vec![
        Consumer::new(
            "order-desk",
            vec![MessageKind::Order, MessageKind::Payment],
            count,
        )
        .spawn(&bus, config)
        .await,
        Consumer::new(
            "stock-keeper",
            vec![MessageKind::Order, MessageKind::Inventory],
            count,
        )
        .spawn(&bus, config)
        .await,
        Consumer::new(
            "dispatcher",
            vec![MessageKind::Payment, MessageKind::Shipping],
            count,
        )
        .spawn(&bus, config)
        .await,
        Consumer::new(
            "notifier",
            vec![
                MessageKind::Order,
                MessageKind::Payment,
                MessageKind::Inventory,
                MessageKind::Shipping,
            ],
            count * 2,
        )
        .spawn(&bus, config)
        .await,
    ];

    let producers = vec![
        Producer::new("order-system", MessageKind::Order, count).spawn(bus.clone(), config),
        Producer::new("payment-system", MessageKind::Payment, count).spawn(bus.clone(), config),
        Producer::new("warehouse", MessageKind::Inventory, count).spawn(bus.clone(), config),
        Producer::new("logistics", MessageKind::Shipping, count).spawn(bus.clone(), config),
    ];

    for producer in producers {
        producer.await.context("producer task failed")?;
    }
    for consumer in consumers {
        let report = consumer.await.context("consumer task failed")?;
        info!(consumer = %report.name, consumed = report.consumed.len(), "drained");
    }

    Ok(bus.stats().await)
}

/// Order intake chained through payment and shipping stages to a final
/// consumer.
pub async fn pipeline(config: &RuntimeConfig) -> Result<BusStats> {
    info!("--- scenario: pipeline ---");
    let bus = Arc::new(MessageBus::new("pipeline-bus"));
    let count = config.messages_per_producer;

    let delivery_desk = Consumer::new("delivery-desk", vec![MessageKind::Shipping], count)
        .spawn(&bus, config)
        .await;
    let payment_stage =
        PipelineStage::new("payment-stage", MessageKind::Order, MessageKind::Payment, count)
            .spawn(&bus, bus.clone(), config)
            .await;
    let shipping_stage = PipelineStage::new(
        "shipping-stage",
        MessageKind::Payment,
        MessageKind::Shipping,
        count,
    )
    .spawn(&bus, bus.clone(), config)
    .await;

    let intake = Producer::new("intake", MessageKind::Order, count).spawn(bus.clone(), config);

    intake.await.context("producer task failed")?;
    payment_stage.await.context("payment stage failed")?;
    shipping_stage.await.context("shipping stage failed")?;
    let report = delivery_desk.await.context("consumer task failed")?;
    info!(consumer = %report.name, consumed = report.consumed.len(), "drained");

    Ok(bus.stats().await)
}
