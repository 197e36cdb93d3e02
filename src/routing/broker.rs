/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Publish/Subscribe routing engine.

use crate::observability::events;
use crate::protocol::id::IdSequence;
use crate::protocol::message::{
    Error, Event, Message, MessageType, Publish, Published, Subscribe, Subscribed, Unsubscribe,
    Unsubscribed,
};
use crate::protocol::{wamp_error, Dict, Id, Uri};
use crate::session::{Outbox, Session};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

const COMPONENT: &str = "broker";

#[derive(Default)]
struct BrokerState {
    /// Live subscriptions per topic, keyed by subscription ID.
    routes: HashMap<Uri, HashMap<Id, Outbox>>,
    /// Reverse index from subscription ID to its topic.
    subscriptions: HashMap<Id, Uri>,
    /// Every subscription owned by a session, for O(k) session teardown.
    session_subs: HashMap<Id, Vec<Id>>,
}

/// Routes `PUBLISH` traffic to topic subscribers by exact URI match.
///
/// A single readers/writer lock protects all three indices: `publish` only
/// reads routing state and takes the read lock; `subscribe`, `unsubscribe`,
/// and `remove_session` take the write lock. Deliveries go through each
/// subscriber's [`Outbox`], so no peer can stall a routing operation.
pub struct Broker {
    state: RwLock<BrokerState>,
    subscription_ids: IdSequence,
    router_ids: Arc<IdSequence>,
}

impl Broker {
    pub fn new() -> Self {
        Self::with_id_sequence(Arc::new(IdSequence::new()))
    }

    /// Creates a broker sharing the router-scoped ID sequence with other
    /// components, so publication IDs never collide with registration or
    /// invocation IDs.
    pub fn with_id_sequence(router_ids: Arc<IdSequence>) -> Self {
        Self {
            state: RwLock::new(BrokerState::default()),
            subscription_ids: IdSequence::new(),
            router_ids,
        }
    }

    /// Dispatches a publication to every subscription on the topic.
    ///
    /// The publisher itself is skipped unless it set `exclude_me: false`.
    /// A topic without subscribers publishes successfully into the void,
    /// and still gets a `PUBLISHED` confirmation when `acknowledge` is set.
    pub async fn publish(&self, session: &Session, publish: Publish) {
        let state = self.state.read().await;

        let publication = self.router_ids.next_id();
        let exclude_publisher = publish.exclude_publisher();
        let publisher = session.outbox().peer_key();

        let mut deliveries = 0usize;
        if let Some(bucket) = state.routes.get(&publish.topic) {
            for (&subscription, subscriber) in bucket {
                if exclude_publisher && subscriber.peer_key() == publisher {
                    continue;
                }
                subscriber.enqueue(Message::Event(Event {
                    subscription,
                    publication,
                    details: Dict::new(),
                    arguments: publish.arguments.clone(),
                    arguments_kw: publish.arguments_kw.clone(),
                }));
                deliveries += 1;
            }
        }

        debug!(
            event = events::PUBLISH_DISPATCH,
            component = COMPONENT,
            session_id = %session.id(),
            topic = %publish.topic,
            publication_id = %publication,
            deliveries,
            "dispatched publish"
        );

        if publish.wants_acknowledgement() {
            session.outbox().enqueue(Message::Published(Published {
                request: publish.request,
                publication,
            }));
            debug!(
                event = events::PUBLISH_ACK,
                component = COMPONENT,
                session_id = %session.id(),
                publication_id = %publication,
                "acknowledged publish"
            );
        }
    }

    /// Adds a subscription and confirms it with `SUBSCRIBED`.
    ///
    /// A session may subscribe to the same topic repeatedly; each call
    /// yields a distinct subscription ID with its own delivery.
    pub async fn subscribe(&self, session: &Session, subscribe: Subscribe) {
        let mut state = self.state.write().await;

        let subscription = self.subscription_ids.next_id();
        state
            .routes
            .entry(subscribe.topic.clone())
            .or_default()
            .insert(subscription, session.outbox().clone());
        state
            .subscriptions
            .insert(subscription, subscribe.topic.clone());
        state
            .session_subs
            .entry(session.id())
            .or_default()
            .push(subscription);

        info!(
            event = events::SUBSCRIBE_OK,
            component = COMPONENT,
            session_id = %session.id(),
            subscription_id = %subscription,
            topic = %subscribe.topic,
            "subscribed"
        );

        session.outbox().enqueue(Message::Subscribed(Subscribed {
            request: subscribe.request,
            subscription,
        }));
    }

    /// Removes a subscription, replying `UNSUBSCRIBED` or a
    /// `wamp.error.no_such_subscription` error for unknown IDs.
    ///
    /// Ownership is deliberately not verified; any session may drop any
    /// live subscription ID it names.
    pub async fn unsubscribe(&self, session: &Session, unsubscribe: Unsubscribe) {
        let mut state = self.state.write().await;

        if !Self::remove_subscription(&mut state, session.id(), unsubscribe.subscription) {
            warn!(
                event = events::UNSUBSCRIBE_NO_SUCH_SUBSCRIPTION,
                component = COMPONENT,
                session_id = %session.id(),
                subscription_id = %unsubscribe.subscription,
                "unsubscribe for unknown subscription"
            );
            session.outbox().enqueue(Message::Error(Error::for_request(
                MessageType::Unsubscribe,
                unsubscribe.request,
                wamp_error::NO_SUCH_SUBSCRIPTION,
            )));
            return;
        }

        info!(
            event = events::UNSUBSCRIBE_OK,
            component = COMPONENT,
            session_id = %session.id(),
            subscription_id = %unsubscribe.subscription,
            "unsubscribed"
        );

        session.outbox().enqueue(Message::Unsubscribed(Unsubscribed {
            request: unsubscribe.request,
        }));
    }

    /// Tears down every subscription a session owns, without replies.
    /// Safe to call for a session that owns nothing.
    pub async fn remove_session(&self, session: &Session) {
        let mut state = self.state.write().await;

        let Some(owned) = state.session_subs.remove(&session.id()) else {
            return;
        };

        let removed = owned.len();
        for subscription in owned {
            Self::remove_subscription(&mut state, session.id(), subscription);
        }

        info!(
            event = events::SESSION_SUBSCRIPTIONS_REMOVED,
            component = COMPONENT,
            session_id = %session.id(),
            removed,
            "removed session subscriptions"
        );
    }

    /// Drops one subscription from all three indices. Returns `false` when
    /// the subscription ID is unknown. Empty topic buckets and empty session
    /// entries are removed with it.
    fn remove_subscription(state: &mut BrokerState, session_id: Id, subscription: Id) -> bool {
        let Some(topic) = state.subscriptions.remove(&subscription) else {
            return false;
        };

        match state.routes.get_mut(&topic) {
            None => {
                error!(
                    event = events::SUBSCRIPTION_INDEX_INCONSISTENT,
                    component = COMPONENT,
                    subscription_id = %subscription,
                    topic = %topic,
                    "subscription names a topic with no routes"
                );
            }
            Some(bucket) => {
                if bucket.remove(&subscription).is_none() {
                    error!(
                        event = events::SUBSCRIPTION_INDEX_INCONSISTENT,
                        component = COMPONENT,
                        subscription_id = %subscription,
                        topic = %topic,
                        "route bucket is missing the subscription"
                    );
                }
                if bucket.is_empty() {
                    state.routes.remove(&topic);
                }
            }
        }

        if let Some(owned) = state.session_subs.get_mut(&session_id) {
            owned.retain(|&id| id != subscription);
            if owned.is_empty() {
                state.session_subs.remove(&session_id);
            }
        }

        true
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}
