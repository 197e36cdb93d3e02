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

//! Peer send-sink contract and peer identity keying used by routing state.

use crate::protocol::message::Message;
use async_trait::async_trait;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

/// Transport-level delivery failure reported by a [`Peer`].
///
/// The routing path never sees this error: the outbox dispatch loop logs it
/// and keeps draining. Disconnect decisions belong to the session layer.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("peer transport closed")]
    Closed,
    #[error("peer transport failure: {0}")]
    Transport(String),
}

/// A one-way send sink for routed messages.
///
/// Implementations wrap a concrete transport (WebSocket writer, in-process
/// channel, test recorder). The router compares peers by identity, never by
/// contents.
#[async_trait]
pub trait Peer: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), SendError>;
}

/// Stable identity of one peer instance.
///
/// Keyed on the `Arc` pointer, so two sessions sharing one peer compare
/// equal and a cloned handle keeps its identity. Used for the
/// exclude-publisher check and for dealer disconnect scans.
#[derive(Clone)]
pub struct PeerKey {
    peer: Arc<dyn Peer>,
}

impl PeerKey {
    pub(crate) fn new(peer: Arc<dyn Peer>) -> Self {
        Self { peer }
    }
}

impl Hash for PeerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.peer).hash(state);
    }
}

impl PartialEq for PeerKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.peer, &other.peer)
    }
}

impl Eq for PeerKey {}

impl Debug for PeerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerKey").finish_non_exhaustive()
    }
}
