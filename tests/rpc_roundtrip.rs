mod support;

use serde_json::json;
use std::sync::Arc;
use support::{attach_session, init_logging, recv_message};
use wamp_router::protocol::id::IdSequence;
use wamp_router::protocol::message::{
    Call, Error, Message, MessageType, Publish, Register, Unregister, Yield,
};
use wamp_router::protocol::{Dict, Id, List, Uri};
use wamp_router::{Broker, Dealer};

fn register_msg(request: u64, procedure: &str) -> Register {
    Register {
        request: Id(request),
        options: Dict::new(),
        procedure: Uri::from(procedure),
    }
}

fn call_msg(request: u64, procedure: &str, arguments: List) -> Call {
    Call {
        request: Id(request),
        options: Dict::new(),
        procedure: Uri::from(procedure),
        arguments,
        arguments_kw: Dict::new(),
    }
}

#[tokio::test]
async fn the_second_registration_of_a_procedure_is_rejected() {
    init_logging();
    let dealer = Dealer::new();
    let (first, mut first_messages) = attach_session(1);
    let (second, mut second_messages) = attach_session(2);

    dealer
        .register(first.outbox(), register_msg(1, "com.example.add"))
        .await;
    match recv_message(&mut first_messages).await {
        Message::Registered(registered) => {
            assert_eq!(registered.request, Id(1));
            assert_ne!(registered.registration, Id(0));
        }
        other => panic!("expected REGISTERED, got {other:?}"),
    }

    dealer
        .register(second.outbox(), register_msg(2, "com.example.add"))
        .await;
    match recv_message(&mut second_messages).await {
        Message::Error(error) => {
            assert_eq!(error.request, Id(2));
            assert_eq!(
                error.error,
                Uri::from("wamp.error.procedure_already_exists")
            );
        }
        other => panic!("expected ERROR, got {other:?}"),
    }
}

#[tokio::test]
async fn a_call_rounds_trip_through_the_callee() {
    init_logging();
    let dealer = Dealer::new();
    let (callee, mut callee_messages) = attach_session(1);
    let (caller, mut caller_messages) = attach_session(2);

    dealer
        .register(callee.outbox(), register_msg(1, "com.example.add"))
        .await;
    let registration = match recv_message(&mut callee_messages).await {
        Message::Registered(registered) => registered.registration,
        other => panic!("expected REGISTERED, got {other:?}"),
    };

    dealer
        .call(
            caller.outbox(),
            call_msg(5, "com.example.add", vec![json!(2), json!(3)]),
        )
        .await;

    let invocation = match recv_message(&mut callee_messages).await {
        Message::Invocation(invocation) => invocation,
        other => panic!("expected INVOCATION, got {other:?}"),
    };
    assert_eq!(invocation.registration, registration);
    assert_eq!(invocation.arguments, vec![json!(2), json!(3)]);

    dealer
        .yield_result(
            callee.outbox(),
            Yield {
                request: invocation.request,
                options: Dict::new(),
                arguments: vec![json!(5)],
                arguments_kw: Dict::new(),
            },
        )
        .await;

    match recv_message(&mut caller_messages).await {
        Message::Result(result) => {
            assert_eq!(result.request, Id(5));
            assert_eq!(result.arguments, vec![json!(5)]);
        }
        other => panic!("expected RESULT, got {other:?}"),
    }
}

#[tokio::test]
async fn calling_an_unknown_procedure_replies_with_an_error() {
    init_logging();
    let dealer = Dealer::new();
    let (caller, mut messages) = attach_session(1);

    dealer
        .call(caller.outbox(), call_msg(8, "com.example.missing", List::new()))
        .await;

    match recv_message(&mut messages).await {
        Message::Error(error) => {
            assert_eq!(error.request, Id(8));
            assert_eq!(error.error, Uri::from("wamp.error.no_such_procedure"));
        }
        other => panic!("expected ERROR, got {other:?}"),
    }
}

#[tokio::test]
async fn a_callee_error_reaches_the_caller_with_its_request_id() {
    init_logging();
    let dealer = Dealer::new();
    let (callee, mut callee_messages) = attach_session(1);
    let (caller, mut caller_messages) = attach_session(2);

    dealer
        .register(callee.outbox(), register_msg(1, "com.example.divide"))
        .await;
    let _registered = recv_message(&mut callee_messages).await;

    dealer
        .call(
            caller.outbox(),
            call_msg(11, "com.example.divide", vec![json!(1), json!(0)]),
        )
        .await;
    let invocation = match recv_message(&mut callee_messages).await {
        Message::Invocation(invocation) => invocation,
        other => panic!("expected INVOCATION, got {other:?}"),
    };

    let mut failure = Error::for_request(
        MessageType::Invocation,
        invocation.request,
        "com.example.error.division_by_zero",
    );
    failure.arguments = Some(vec![json!("denominator is zero")]);
    dealer.error(callee.outbox(), failure).await;

    match recv_message(&mut caller_messages).await {
        Message::Error(error) => {
            assert_eq!(error.request_type, MessageType::Call);
            assert_eq!(error.request, Id(11));
            assert_eq!(
                error.error,
                Uri::from("com.example.error.division_by_zero")
            );
            assert_eq!(error.arguments, Some(vec![json!("denominator is zero")]));
        }
        other => panic!("expected ERROR, got {other:?}"),
    }
}

#[tokio::test]
async fn an_unregistered_procedure_stops_taking_calls() {
    init_logging();
    let dealer = Dealer::new();
    let (callee, mut callee_messages) = attach_session(1);
    let (caller, mut caller_messages) = attach_session(2);

    dealer
        .register(callee.outbox(), register_msg(1, "com.example.flaky"))
        .await;
    let registration = match recv_message(&mut callee_messages).await {
        Message::Registered(registered) => registered.registration,
        other => panic!("expected REGISTERED, got {other:?}"),
    };

    dealer
        .unregister(
            callee.outbox(),
            Unregister {
                request: Id(2),
                registration,
            },
        )
        .await;
    let _unregistered = recv_message(&mut callee_messages).await;

    dealer
        .call(caller.outbox(), call_msg(3, "com.example.flaky", List::new()))
        .await;

    match recv_message(&mut caller_messages).await {
        Message::Error(error) => {
            assert_eq!(error.error, Uri::from("wamp.error.no_such_procedure"));
        }
        other => panic!("expected ERROR, got {other:?}"),
    }
}

#[tokio::test]
async fn a_disconnecting_callee_cancels_the_calls_it_strands() {
    init_logging();
    let dealer = Dealer::new();
    let (callee, mut callee_messages) = attach_session(1);
    let (caller, mut caller_messages) = attach_session(2);

    dealer
        .register(callee.outbox(), register_msg(1, "com.example.slow"))
        .await;
    let _registered = recv_message(&mut callee_messages).await;

    dealer
        .call(caller.outbox(), call_msg(9, "com.example.slow", List::new()))
        .await;
    let _invocation = recv_message(&mut callee_messages).await;

    dealer.disconnect(callee.outbox()).await;

    match recv_message(&mut caller_messages).await {
        Message::Error(error) => {
            assert_eq!(error.request_type, MessageType::Call);
            assert_eq!(error.request, Id(9));
            assert_eq!(error.error, Uri::from("wamp.error.canceled"));
        }
        other => panic!("expected ERROR, got {other:?}"),
    }
}

#[tokio::test]
async fn a_shared_sequence_keeps_router_assigned_ids_distinct_across_engines() {
    init_logging();
    let router_ids = Arc::new(IdSequence::new());
    let broker = Broker::with_id_sequence(router_ids.clone());
    let dealer = Dealer::with_id_sequence(router_ids);

    let (session, mut messages) = attach_session(1);

    dealer
        .register(session.outbox(), register_msg(1, "com.example.add"))
        .await;
    let registration = match recv_message(&mut messages).await {
        Message::Registered(registered) => registered.registration,
        other => panic!("expected REGISTERED, got {other:?}"),
    };

    let mut options = Dict::new();
    options.insert("acknowledge".to_string(), json!(true));
    broker
        .publish(
            &session,
            Publish {
                request: Id(2),
                options,
                topic: Uri::from("com.example.topic"),
                arguments: List::new(),
                arguments_kw: Dict::new(),
            },
        )
        .await;
    let publication = match recv_message(&mut messages).await {
        Message::Published(published) => published.publication,
        other => panic!("expected PUBLISHED, got {other:?}"),
    };

    assert_ne!(registration, publication);
}
