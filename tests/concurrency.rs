mod support;

use serde_json::json;
use std::sync::Arc;
use support::{assert_silent, attach_session, init_logging, recv_message};
use wamp_router::protocol::message::{Message, Publish, Subscribe};
use wamp_router::protocol::{Dict, Id, Uri};
use wamp_router::Broker;

const SUBSCRIBERS: u64 = 4;
const PUBLISHERS: u64 = 6;

fn subscribe_msg(topic: &str) -> Subscribe {
    Subscribe {
        request: Id(1),
        options: Dict::new(),
        topic: Uri::from(topic),
    }
}

fn publish_msg(request: u64, topic: &str, publisher: u64) -> Publish {
    Publish {
        request: Id(request),
        options: Dict::new(),
        topic: Uri::from(topic),
        arguments: vec![json!(publisher)],
        arguments_kw: Dict::new(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn parallel_publishers_fan_out_to_every_subscriber_exactly_once() {
    init_logging();
    let broker = Arc::new(Broker::new());

    let mut subscribers = Vec::new();
    for id in 1..=SUBSCRIBERS {
        let (session, mut messages) = attach_session(id);
        broker
            .subscribe(&session, subscribe_msg("com.example.burst"))
            .await;
        let _subscribed = recv_message(&mut messages).await;
        subscribers.push((session, messages));
    }

    let mut publishers = Vec::new();
    for id in 1..=PUBLISHERS {
        let broker = broker.clone();
        publishers.push(tokio::spawn(async move {
            let (session, _messages) = attach_session(100 + id);
            broker
                .publish(&session, publish_msg(id, "com.example.burst", id))
                .await;
        }));
    }
    for publisher in publishers {
        publisher.await.expect("publisher task should complete");
    }

    for (_, messages) in &mut subscribers {
        let mut seen = Vec::new();
        for _ in 0..PUBLISHERS {
            match recv_message(messages).await {
                Message::Event(event) => seen.push(event.arguments[0].clone()),
                other => panic!("expected EVENT, got {other:?}"),
            }
        }
        seen.sort_by_key(|value| value.as_u64());
        let expected: Vec<_> = (1..=PUBLISHERS).map(|id| json!(id)).collect();
        assert_eq!(seen, expected);
        assert_silent(messages).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_publishing_subscribers_never_hear_themselves() {
    const ROUNDS: u64 = 5;

    init_logging();
    let broker = Arc::new(Broker::new());

    let (left, mut left_messages) = attach_session(1);
    let (right, mut right_messages) = attach_session(2);
    broker
        .subscribe(&left, subscribe_msg("com.example.duplex"))
        .await;
    broker
        .subscribe(&right, subscribe_msg("com.example.duplex"))
        .await;
    let _subscribed = recv_message(&mut left_messages).await;
    let _subscribed = recv_message(&mut right_messages).await;

    let broker_for_left = broker.clone();
    let left_task = tokio::spawn(async move {
        for round in 1..=ROUNDS {
            broker_for_left
                .publish(&left, publish_msg(round, "com.example.duplex", 1))
                .await;
        }
        left
    });
    let broker_for_right = broker.clone();
    let right_task = tokio::spawn(async move {
        for round in 1..=ROUNDS {
            broker_for_right
                .publish(&right, publish_msg(round, "com.example.duplex", 2))
                .await;
        }
        right
    });
    let _left = left_task.await.expect("left task should complete");
    let _right = right_task.await.expect("right task should complete");

    for (messages, expected_origin) in
        [(&mut left_messages, 2u64), (&mut right_messages, 1u64)]
    {
        for _ in 0..ROUNDS {
            match recv_message(messages).await {
                Message::Event(event) => {
                    assert_eq!(event.arguments, vec![json!(expected_origin)])
                }
                other => panic!("expected EVENT, got {other:?}"),
            }
        }
        assert_silent(messages).await;
    }
}
