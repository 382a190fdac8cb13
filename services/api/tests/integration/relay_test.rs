use std::collections::HashSet;
use std::sync::Arc;

use abha_api::relay::broadcast::{BroadcastRelay, Payload};
use abha_api::relay::registry::{ConnectionId, ConnectionRegistry};
use abha_testing::clock::ManualClock;

fn relay() -> BroadcastRelay {
    BroadcastRelay::new(ConnectionRegistry::new(Arc::new(ManualClock::epoch())))
}

#[test]
fn should_follow_two_connection_scenario() {
    let relay = relay();
    let x = ConnectionId::new();
    let y = ConnectionId::new();
    let mut mx = relay.registry().register(x);
    let mut my = relay.registry().register(y);

    assert_eq!(relay.publish(x, "hello".into()), 2);
    assert_eq!(mx.try_recv().unwrap(), Payload::from("hello"));
    assert_eq!(my.try_recv().unwrap(), Payload::from("hello"));

    relay.registry().unregister(y);
    assert_eq!(relay.registry().list_active(), HashSet::from([x]));

    assert_eq!(relay.publish(x, "bye".into()), 1);
    assert_eq!(mx.try_recv().unwrap(), Payload::from("bye"));
    assert!(my.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_deliver_every_publish_in_sender_order_under_concurrency() {
    const SENDERS: usize = 4;
    const PER_SENDER: usize = 200;

    let relay = relay();
    let listener = ConnectionId::new();
    let mut mailbox = relay.registry().register(listener);

    let senders: Vec<ConnectionId> = (0..SENDERS).map(|_| ConnectionId::new()).collect();
    let mut sender_mailboxes: Vec<_> = senders
        .iter()
        .map(|id| relay.registry().register(*id))
        .collect();

    let handles: Vec<_> = senders
        .iter()
        .enumerate()
        .map(|(n, id)| {
            let relay = relay.clone();
            let id = *id;
            tokio::spawn(async move {
                for i in 0..PER_SENDER {
                    relay.publish(id, Payload::from(format!("{n}:{i}").as_str()));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let mut next = vec![0usize; SENDERS];
    for _ in 0..SENDERS * PER_SENDER {
        let Payload::Text(text) = mailbox.recv().await.unwrap() else {
            panic!("expected text payload");
        };
        let (n, i) = text.split_once(':').unwrap();
        let (n, i): (usize, usize) = (n.parse().unwrap(), i.parse().unwrap());
        assert_eq!(i, next[n], "sender {n} delivered out of order");
        next[n] += 1;
    }
    assert!(mailbox.try_recv().is_err());

    // every sender also received its own messages
    for mailbox in &mut sender_mailboxes {
        let mut count = 0;
        while mailbox.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, SENDERS * PER_SENDER);
    }
}

#[test]
fn should_keep_registry_consistent_under_churn() {
    let registry = ConnectionRegistry::new(Arc::new(ManualClock::epoch()));
    let stable = ConnectionId::new();
    let _stable_mailbox = registry.register(stable);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..100 {
                    let id = ConnectionId::new();
                    let _mailbox = registry.register(id);
                    assert!(registry.list_active().contains(&id));
                    assert!(registry.unregister(id));
                }
            });
        }
    });

    assert_eq!(registry.list_active(), HashSet::from([stable]));
}
