// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::node::Node;
use uuid::Uuid;

/// Interface to the store where enrolled nodes are kept.  Implementations
/// shared between threads must support concurrent lookups.
pub trait INodeStore {
    /// Lookup an enrolled node given its identifier
    fn lookup(&self, node_id: &Uuid) -> Option<Node>;
}
