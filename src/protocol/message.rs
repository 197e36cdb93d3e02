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

//! Typed shapes for the routed message set.
//!
//! Field layout follows the WAMP basic profile for the messages the broker
//! and dealer handle. Session establishment messages (HELLO/WELCOME/GOODBYE)
//! belong to the surrounding session layer and are not modeled here.

use crate::protocol::{Dict, Id, List, Uri};
use serde::{Deserialize, Serialize};

/// Protocol message type codes for the routed subset.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[repr(u64)]
pub enum MessageType {
    Error = 8,
    Publish = 16,
    Published = 17,
    Subscribe = 32,
    Subscribed = 33,
    Unsubscribe = 34,
    Unsubscribed = 35,
    Event = 36,
    Call = 48,
    Result = 50,
    Register = 64,
    Registered = 65,
    Unregister = 66,
    Unregistered = 67,
    Invocation = 68,
    Yield = 70,
}

impl MessageType {
    /// The numeric code this type carries on the wire.
    pub fn code(self) -> u64 {
        self as u64
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Subscribe {
    pub request: Id,
    pub options: Dict,
    pub topic: Uri,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Subscribed {
    pub request: Id,
    pub subscription: Id,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Unsubscribe {
    pub request: Id,
    pub subscription: Id,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Unsubscribed {
    pub request: Id,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Publish {
    pub request: Id,
    pub options: Dict,
    pub topic: Uri,
    pub arguments: List,
    pub arguments_kw: Dict,
}

impl Publish {
    /// `exclude_me` option; the publisher is excluded unless it opts in with
    /// an explicit `false`. Non-boolean values are ignored.
    pub fn exclude_publisher(&self) -> bool {
        self.options
            .get("exclude_me")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true)
    }

    /// `acknowledge` option; a `PUBLISHED` confirmation is only sent on an
    /// explicit `true`. Non-boolean values are ignored.
    pub fn wants_acknowledgement(&self) -> bool {
        self.options
            .get("acknowledge")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Published {
    pub request: Id,
    pub publication: Id,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Event {
    pub subscription: Id,
    pub publication: Id,
    pub details: Dict,
    pub arguments: List,
    pub arguments_kw: Dict,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Register {
    pub request: Id,
    pub options: Dict,
    pub procedure: Uri,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Registered {
    pub request: Id,
    pub registration: Id,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Unregister {
    pub request: Id,
    pub registration: Id,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Unregistered {
    pub request: Id,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Call {
    pub request: Id,
    pub options: Dict,
    pub procedure: Uri,
    pub arguments: List,
    pub arguments_kw: Dict,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Invocation {
    pub request: Id,
    pub registration: Id,
    pub details: Dict,
    pub arguments: List,
    pub arguments_kw: Dict,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Yield {
    pub request: Id,
    pub options: Dict,
    pub arguments: List,
    pub arguments_kw: Dict,
}

/// The `RESULT` message relaying a yielded value back to the caller.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CallResult {
    pub request: Id,
    pub details: Dict,
    pub arguments: List,
    pub arguments_kw: Dict,
}

/// An `ERROR` reply. `request_type` names the message type being errored so
/// the receiver can correlate the reply with the right outstanding request.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Error {
    pub request_type: MessageType,
    pub request: Id,
    pub details: Dict,
    pub error: Uri,
    pub arguments: Option<List>,
    pub arguments_kw: Option<Dict>,
}

impl Error {
    /// Builds a bare router-generated error reply for a failed request.
    pub fn for_request(request_type: MessageType, request: Id, error: impl Into<Uri>) -> Self {
        Self {
            request_type,
            request,
            details: Dict::new(),
            error: error.into(),
            arguments: None,
            arguments_kw: None,
        }
    }
}

/// Any message the routing core sends or receives through a peer send sink.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Message {
    Subscribe(Subscribe),
    Subscribed(Subscribed),
    Unsubscribe(Unsubscribe),
    Unsubscribed(Unsubscribed),
    Publish(Publish),
    Published(Published),
    Event(Event),
    Register(Register),
    Registered(Registered),
    Unregister(Unregister),
    Unregistered(Unregistered),
    Call(Call),
    Invocation(Invocation),
    Yield(Yield),
    Result(CallResult),
    Error(Error),
}

impl Message {
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Subscribe(_) => MessageType::Subscribe,
            Message::Subscribed(_) => MessageType::Subscribed,
            Message::Unsubscribe(_) => MessageType::Unsubscribe,
            Message::Unsubscribed(_) => MessageType::Unsubscribed,
            Message::Publish(_) => MessageType::Publish,
            Message::Published(_) => MessageType::Published,
            Message::Event(_) => MessageType::Event,
            Message::Register(_) => MessageType::Register,
            Message::Registered(_) => MessageType::Registered,
            Message::Unregister(_) => MessageType::Unregister,
            Message::Unregistered(_) => MessageType::Unregistered,
            Message::Call(_) => MessageType::Call,
            Message::Invocation(_) => MessageType::Invocation,
            Message::Yield(_) => MessageType::Yield,
            Message::Result(_) => MessageType::Result,
            Message::Error(_) => MessageType::Error,
        }
    }
}
