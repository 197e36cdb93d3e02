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

//! Session layer contract.
//!
//! Owns the [`Peer`] send-sink seam the router consumes, peer identity
//! keying, and the per-peer outbound queue. The session handshake itself
//! (HELLO/WELCOME, authentication, realm selection) happens outside the
//! crate; by the time a [`Session`] exists it already carries its
//! router-assigned ID and its transport.

mod outbox;
mod peer;

pub use outbox::Outbox;
pub use peer::{Peer, PeerKey, SendError};

use crate::protocol::id::IdSequence;
use crate::protocol::Id;
use std::sync::Arc;

/// One attached client session.
///
/// The routing core uses the session only as an identity and a routing
/// target; it never inspects the peer's transport.
pub struct Session {
    id: Id,
    outbox: Outbox,
    request_ids: IdSequence,
}

impl Session {
    /// Binds a session ID to a peer and spawns the peer's outbound queue.
    ///
    /// Must be called within a tokio runtime.
    pub fn attach(id: Id, peer: Arc<dyn Peer>) -> Self {
        Self {
            id,
            outbox: Outbox::spawn(id, peer),
            request_ids: IdSequence::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// The session's outbound queue handle.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Next request ID for client-originated request correlation.
    pub fn next_request_id(&self) -> Id {
        self.request_ids.next_id()
    }
}
