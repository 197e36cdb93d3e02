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

//! # wamp-router
//!
//! `wamp-router` implements the in-memory routing core of a WAMP-style
//! router: a [`Broker`] that routes Publish/Subscribe events from publishers
//! to topic subscribers, and a [`Dealer`] that routes RPC invocations from a
//! caller through a registered callee and relays the result back.
//!
//! The crate owns routing state only. Transports, serialization, and the
//! session handshake live outside it, behind the [`Peer`] send-sink trait:
//! the surrounding session layer demultiplexes inbound frames and hands typed
//! [`protocol::message`] values to the matching routing operation.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use wamp_router::protocol::message::{Message, Publish, Subscribe};
//! use wamp_router::protocol::{Dict, Id, List, Uri};
//! use wamp_router::{Broker, Peer, SendError, Session};
//!
//! # struct NullPeer;
//! #
//! # #[async_trait]
//! # impl Peer for NullPeer {
//! #     async fn send(&self, _message: Message) -> Result<(), SendError> {
//! #         Ok(())
//! #     }
//! # }
//! #
//! # tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap().block_on(async {
//! let broker = Broker::new();
//!
//! let subscriber = Session::attach(Id(1), Arc::new(NullPeer));
//! broker
//!     .subscribe(
//!         &subscriber,
//!         Subscribe {
//!             request: subscriber.next_request_id(),
//!             options: Dict::new(),
//!             topic: Uri::from("com.example.onboard"),
//!         },
//!     )
//!     .await;
//!
//! let publisher = Session::attach(Id(2), Arc::new(NullPeer));
//! broker
//!     .publish(
//!         &publisher,
//!         Publish {
//!             request: publisher.next_request_id(),
//!             options: Dict::new(),
//!             topic: Uri::from("com.example.onboard"),
//!             arguments: List::new(),
//!             arguments_kw: Dict::new(),
//!         },
//!     )
//!     .await;
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Protocol model: message shapes, identifiers, well-known error URIs
//! - Session layer contract: [`Peer`] send sink, per-peer outbound queue
//! - Routing: [`Broker`] and [`Dealer`] state owners
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events. Library code emits events and
//! does not unconditionally initialize a global subscriber. Binaries and
//! tests are responsible for one-time `tracing_subscriber` initialization at
//! process boundaries.

mod observability;
pub mod protocol;

mod session;
pub use session::{Outbox, Peer, PeerKey, SendError, Session};

mod routing;
pub use routing::{Broker, Dealer};
