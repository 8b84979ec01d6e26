//! Publish fan-out throughput benchmarks.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use courier_bus::{Capacity, Mailbox, MessageBus};
use courier_types::{Message, MessageKind};

fn bench_publish_fanout(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("runtime");

    let bus = Arc::new(MessageBus::new("bench-bus"));
    let mut mailboxes: Vec<Mailbox> = (0..4).map(|_| Mailbox::new(Capacity::Unbounded)).collect();
    rt.block_on(async {
        for mailbox in &mailboxes {
            bus.subscribe(MessageKind::Order, mailbox).await;
        }
    });

    c.bench_function("publish_fanout_4", |b| {
        b.iter(|| {
            rt.block_on(async {
                bus.publish(Message::new(MessageKind::Order, "bench", "bench-producer"))
                    .await
                    .expect("publish");
                // Keep the queues flat so iterations stay comparable.
                for mailbox in &mut mailboxes {
                    let _ = mailbox.try_recv();
                }
            });
        });
    });
}

criterion_group!(benches, bench_publish_fanout);
criterion_main!(benches);
