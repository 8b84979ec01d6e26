//! # End-to-End Scenarios
//!
//! The three canonical wirings, driven through the demo roles:
//!
//! - **A**: one subscriber, three ordered messages, then an empty window.
//! - **B**: two concurrent producers into one consumer, counts exact.
//! - **C**: a pipeline stage deriving a Payment from each consumed Order.

use std::sync::Arc;
use std::time::Duration;

use courier_bus::{Capacity, Mailbox, MessageBus};
use courier_runtime::{Consumer, PipelineStage, Producer, RuntimeConfig};
use courier_types::{Message, MessageKind};

fn fast_config() -> RuntimeConfig {
    RuntimeConfig {
        recv_window: Duration::from_millis(200),
        idle_limit: 3,
        max_pace: Duration::ZERO,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn test_scenario_a_ordered_delivery_then_empty() {
    let bus = MessageBus::new("scenario-a");
    let mut mailbox = Mailbox::new(Capacity::Unbounded);
    bus.subscribe(MessageKind::Order, &mailbox).await;

    for content in ["o1", "o2", "o3"] {
        bus.publish(Message::new(MessageKind::Order, content, "order-service"))
            .await
            .expect("publish");
    }

    for expected in ["o1", "o2", "o3"] {
        let msg = mailbox
            .recv(Duration::from_millis(100))
            .await
            .expect("message");
        assert_eq!(msg.content(), expected);
    }
    assert!(
        mailbox.recv(Duration::from_millis(50)).await.is_none(),
        "fourth receive must report an empty window"
    );
}

#[tokio::test]
async fn test_scenario_b_two_producers_one_consumer() {
    let config = fast_config();
    let bus = Arc::new(MessageBus::new("scenario-b"));

    let consumer = Consumer::new("order-worker", vec![MessageKind::Order], 10)
        .spawn(&bus, &config)
        .await;

    let producers = vec![
        Producer::new("service-a", MessageKind::Order, 5).spawn(bus.clone(), &config),
        Producer::new("service-b", MessageKind::Order, 5).spawn(bus.clone(), &config),
    ];
    for producer in producers {
        assert_eq!(producer.await.expect("producer task"), 5);
    }

    let report = consumer.await.expect("consumer task");
    assert_eq!(report.consumed.len(), 10);
    assert_eq!(bus.stats().await.total_published, 10);
}

#[tokio::test]
async fn test_scenario_c_pipeline_derives_one_payment() {
    let config = fast_config();
    let bus = Arc::new(MessageBus::new("scenario-c"));

    let mut downstream = Mailbox::new(Capacity::Unbounded);
    bus.subscribe(MessageKind::Payment, &downstream).await;

    let stage = PipelineStage::new("payment-stage", MessageKind::Order, MessageKind::Payment, 1)
        .spawn(&bus, bus.clone(), &config)
        .await;

    bus.publish(Message::new(MessageKind::Order, "order-42", "intake"))
        .await
        .expect("publish");
    assert_eq!(stage.await.expect("stage task"), 1);

    let derived = downstream
        .recv(Duration::from_millis(200))
        .await
        .expect("derived message");
    assert_eq!(derived.kind(), MessageKind::Payment);
    assert_eq!(derived.content(), "processed-order-42");
    assert!(
        downstream.recv(Duration::from_millis(50)).await.is_none(),
        "exactly one derived message expected"
    );
}
