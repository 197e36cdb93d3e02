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

//! Protocol model layer.
//!
//! Owns the identifier types, the typed message shapes, and the well-known
//! error URIs that the routing engines exchange through peer send sinks.
//! Wire framing and serialization formats stay outside the crate.

pub mod id;
pub mod message;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

/// Largest routable identifier, `2^53 - 1`, chosen so every ID survives a
/// round trip through a JSON `Number`.
pub const MAX_REQUEST_ID: u64 = (1 << 53) - 1;

/// Positional call/publish arguments.
pub type List = Vec<serde_json::Value>;

/// Keyword arguments, message options, and event details.
pub type Dict = serde_json::Map<String, serde_json::Value>;

/// An opaque non-empty string naming a topic or a procedure.
///
/// Routing is exact-match only: two URIs route together iff they are equal.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Uri(String);

impl Uri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uri {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

impl From<String> for Uri {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl Borrow<str> for Uri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Uri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A routable identifier in `[1, MAX_REQUEST_ID]`.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Id(pub u64);

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Well-known error URIs carried by router-generated `ERROR` replies.
pub mod wamp_error {
    pub const NO_SUCH_SUBSCRIPTION: &str = "wamp.error.no_such_subscription";
    pub const NO_SUCH_REGISTRATION: &str = "wamp.error.no_such_registration";
    pub const NO_SUCH_PROCEDURE: &str = "wamp.error.no_such_procedure";
    pub const PROCEDURE_ALREADY_EXISTS: &str = "wamp.error.procedure_already_exists";
    pub const INTERNAL_ERROR: &str = "wamp.error.internal_error";
    pub const CANCELED: &str = "wamp.error.canceled";
}
