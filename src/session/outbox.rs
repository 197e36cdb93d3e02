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

//! Per-peer outbound queue decoupling routing from transport latency.

use crate::observability::{events, fields};
use crate::protocol::message::Message;
use crate::protocol::Id;
use crate::session::peer::{Peer, PeerKey};
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const COMPONENT: &str = "outbox";

/// Clonable handle onto one session's outbound queue.
///
/// Routing operations enqueue without blocking and without observing
/// transport errors; a dedicated dispatch loop drains the queue into
/// [`Peer::send`] one message at a time, which keeps per-peer delivery in
/// enqueue order and keeps a slow peer from stalling the routing engine.
/// The loop ends when every handle has been dropped.
#[derive(Clone)]
pub struct Outbox {
    session_id: Id,
    peer_key: PeerKey,
    queue: mpsc::UnboundedSender<Message>,
}

impl Outbox {
    /// Spawns the dispatch loop for `peer` and returns the queue handle.
    ///
    /// Must be called within a tokio runtime.
    pub(crate) fn spawn(session_id: Id, peer: Arc<dyn Peer>) -> Self {
        let (queue, messages) = mpsc::unbounded_channel();
        tokio::spawn(dispatch_loop(session_id, peer.clone(), messages));

        Self {
            session_id,
            peer_key: PeerKey::new(peer),
            queue,
        }
    }

    /// Queues one message for delivery. Fire-and-forget on the routing path.
    pub fn enqueue(&self, message: Message) {
        if self.queue.send(message).is_err() {
            warn!(
                event = events::OUTBOX_ENQUEUE_DROPPED,
                component = COMPONENT,
                session_id = %self.session_id,
                reason = fields::REASON_QUEUE_CLOSED,
                "dropping message for closed outbox"
            );
        }
    }

    /// Identity of the peer behind this outbox.
    pub fn peer_key(&self) -> &PeerKey {
        &self.peer_key
    }

    pub fn session_id(&self) -> Id {
        self.session_id
    }
}

impl Debug for Outbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outbox")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl Hash for Outbox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.peer_key.hash(state);
    }
}

impl PartialEq for Outbox {
    fn eq(&self, other: &Self) -> bool {
        self.peer_key == other.peer_key
    }
}

impl Eq for Outbox {}

/// Drains the session queue into the peer until every handle drops.
async fn dispatch_loop(
    session_id: Id,
    peer: Arc<dyn Peer>,
    mut messages: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(message) = messages.recv().await {
        let message_type = message.message_type();
        if let Err(err) = peer.send(message).await {
            warn!(
                event = events::OUTBOX_SEND_FAILED,
                component = COMPONENT,
                session_id = %session_id,
                msg_type = ?message_type,
                err = %err,
                "peer send failed"
            );
        }
    }

    debug!(
        event = events::OUTBOX_CLOSED,
        component = COMPONENT,
        session_id = %session_id,
        reason = fields::REASON_QUEUE_CLOSED,
        "outbox handles dropped; stopping dispatch loop"
    );
}
