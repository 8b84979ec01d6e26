//! # Guarantee Tests
//!
//! Exercises the bus's contractual guarantees under concurrency:
//!
//! 1. **Total order per kind**: every subscriber of a kind observes the same
//!    message sequence, whatever the producer interleaving.
//! 2. **Count monotonicity**: the publish total equals the number of publish
//!    calls at any concurrency degree.
//! 3. **Backpressure**: a full block-policy mailbox stalls its publisher
//!    until a drain, without stalling other kinds.
//! 4. **Fan-out completeness**: K registered subscribers, exactly K enqueues.

use std::sync::Arc;
use std::time::Duration;

use courier_bus::{Capacity, Mailbox, MessageBus};
use courier_types::{Message, MessageKind};

/// Drain everything currently enqueued. Publishers have been joined by the
/// time this runs, so an empty `try_recv` means the mailbox is done.
fn drain(mailbox: &mut Mailbox) -> Vec<Message> {
    let mut drained = Vec::new();
    while let Some(message) = mailbox.try_recv() {
        drained.push(message);
    }
    drained
}

#[tokio::test]
async fn test_total_order_per_kind_across_subscribers() {
    const PRODUCERS: usize = 3;
    const PER_PRODUCER: usize = 20;

    let bus = Arc::new(MessageBus::new("order-test"));
    let mut first = Mailbox::new(Capacity::Unbounded);
    let mut second = Mailbox::new(Capacity::Unbounded);
    bus.subscribe(MessageKind::Order, &first).await;
    bus.subscribe(MessageKind::Order, &second).await;

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let bus = bus.clone();
            tokio::spawn(async move {
                for n in 1..=PER_PRODUCER {
                    // Jitter the interleaving so producers genuinely race.
                    let pause = u64::from(rand::random::<u8>() % 3);
                    tokio::time::sleep(Duration::from_millis(pause)).await;
                    bus.publish(Message::new(
                        MessageKind::Order,
                        format!("{n}"),
                        format!("producer-{p}"),
                    ))
                    .await
                    .expect("publish");
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await.expect("producer task");
    }

    let seen_by_first: Vec<_> = drain(&mut first)
        .iter()
        .map(|m| (m.sender().to_owned(), m.content().to_owned()))
        .collect();
    let seen_by_second: Vec<_> = drain(&mut second)
        .iter()
        .map(|m| (m.sender().to_owned(), m.content().to_owned()))
        .collect();

    assert_eq!(seen_by_first.len(), PRODUCERS * PER_PRODUCER);
    // Both subscribers observed the one global per-kind order.
    assert_eq!(seen_by_first, seen_by_second);

    // And within that order, each producer's own messages stay sequential.
    for p in 0..PRODUCERS {
        let sender = format!("producer-{p}");
        let contents: Vec<_> = seen_by_first
            .iter()
            .filter(|(from, _)| *from == sender)
            .map(|(_, content)| content.clone())
            .collect();
        let expected: Vec<_> = (1..=PER_PRODUCER).map(|n| n.to_string()).collect();
        assert_eq!(contents, expected, "producer {p} out of order");
    }
}

#[tokio::test]
async fn test_publish_count_is_exact_under_concurrency() {
    const TASKS: u64 = 4;
    const PER_TASK: u64 = 25;

    let bus = Arc::new(MessageBus::new("count-test"));
    let tasks: Vec<_> = (0..TASKS)
        .map(|t| {
            let bus = bus.clone();
            // Alternate kinds so different lanes increment the one counter.
            let kind = if t % 2 == 0 {
                MessageKind::Order
            } else {
                MessageKind::Payment
            };
            tokio::spawn(async move {
                for n in 0..PER_TASK {
                    bus.publish(Message::new(kind, format!("{n}"), format!("task-{t}")))
                        .await
                        .expect("publish");
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.expect("publisher task");
    }

    assert_eq!(bus.total_published(), TASKS * PER_TASK);
    assert_eq!(bus.stats().await.total_published, TASKS * PER_TASK);
}

#[tokio::test]
async fn test_backpressure_stalls_publisher_until_drain() {
    let bus = Arc::new(MessageBus::new("pressure-test"));
    let mut mailbox = Mailbox::new(Capacity::Bounded(1));
    bus.subscribe(MessageKind::Order, &mailbox).await;

    bus.publish(Message::new(MessageKind::Order, "o1", "producer"))
        .await
        .expect("first publish");

    // Capacity reached: the next publish must wait for the consumer.
    let stalled = {
        let bus = bus.clone();
        tokio::spawn(async move {
            bus.publish(Message::new(MessageKind::Order, "o2", "producer"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!stalled.is_finished(), "publish completed past capacity");

    // Other kinds keep flowing while the Order lane is stalled.
    let mut payment_box = Mailbox::new(Capacity::Unbounded);
    bus.subscribe(MessageKind::Payment, &payment_box).await;
    bus.publish(Message::new(MessageKind::Payment, "p1", "billing"))
        .await
        .expect("cross-kind publish");
    assert!(payment_box
        .recv(Duration::from_millis(100))
        .await
        .is_some());

    // Draining one message releases the stalled publisher.
    assert_eq!(
        mailbox
            .recv(Duration::from_millis(100))
            .await
            .expect("first message")
            .content(),
        "o1"
    );
    stalled
        .await
        .expect("stalled task")
        .expect("stalled publish completes");
    assert_eq!(
        mailbox
            .recv(Duration::from_millis(100))
            .await
            .expect("second message")
            .content(),
        "o2"
    );
}

#[tokio::test]
async fn test_fan_out_is_complete_and_exact() {
    const SUBSCRIBERS: usize = 5;
    const MESSAGES: usize = 7;

    let bus = MessageBus::new("fanout-test");
    let mut boxes: Vec<_> = (0..SUBSCRIBERS)
        .map(|_| Mailbox::new(Capacity::Unbounded))
        .collect();
    for mailbox in &boxes {
        bus.subscribe(MessageKind::Inventory, mailbox).await;
    }

    for n in 0..MESSAGES {
        let reached = bus
            .publish(Message::new(
                MessageKind::Inventory,
                format!("stock-{n}"),
                "warehouse",
            ))
            .await
            .expect("publish");
        assert_eq!(reached, SUBSCRIBERS);
    }

    for mailbox in &mut boxes {
        assert_eq!(drain(mailbox).len(), MESSAGES);
    }
}
