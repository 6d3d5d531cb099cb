// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::node::Node;
use super::INodeStore;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// The store where enrolled nodes are stashed.  Nodes are indexed by their
/// node-id.
#[derive(Debug)]
pub struct MemoNodeStore {
    p: RwLock<HashMap<Uuid, Node>>,
}

impl Default for MemoNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoNodeStore {
    /// Returns a new empty NodeStore
    pub fn new() -> Self {
        Self {
            p: Default::default(),
        }
    }

    /// Add to an existing (and possibly empty) NodeStore the nodes loaded
    /// from the given JSON file.  Nothing is added if any of the records is
    /// invalid or already known.
    pub fn load_json(&self, j: &str) -> Result<(), Error> {
        let nodes: Vec<Node> = serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))?;

        let mut p = self.p.write().unwrap_or_else(PoisonError::into_inner);

        for (i, n) in nodes.iter().enumerate() {
            n.validate()?;

            if p.contains_key(&n.id) || nodes[..i].iter().any(|o| o.id == n.id) {
                return Err(Error::DuplicatedNode(n.id.to_string()));
            }
        }

        for n in nodes {
            p.insert(n.id, n);
        }

        Ok(())
    }

    /// Serialise the store contents, ordered by node-id
    pub fn to_json(&self) -> Result<String, Error> {
        let p = self.p.read().unwrap_or_else(PoisonError::into_inner);

        let mut nodes: Vec<&Node> = p.values().collect();
        nodes.sort_by_key(|n| n.id);

        serde_json::to_string_pretty(&nodes).map_err(|e| Error::Syntax(e.to_string()))
    }

    /// Add a node, failing if its node-id is already taken
    pub fn insert(&self, node: Node) -> Result<(), Error> {
        node.validate()?;

        let mut p = self.p.write().unwrap_or_else(PoisonError::into_inner);

        if p.contains_key(&node.id) {
            return Err(Error::DuplicatedNode(node.id.to_string()));
        }

        p.insert(node.id, node);

        Ok(())
    }

    /// Add or overwrite a node
    pub fn upsert(&self, node: Node) -> Result<(), Error> {
        node.validate()?;

        self.p
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(node.id, node);

        Ok(())
    }

    /// Enroll a node with its AK (and optionally EK) under a freshly
    /// generated node-id, which is returned to the caller
    pub fn enroll(&self, ak_pub: &str, ek_pub: Option<&str>) -> Result<Uuid, Error> {
        let node = Node {
            ek_pub: ek_pub.map(str::to_string),
            ..Node::new(Uuid::new_v4(), ak_pub)
        };
        let id = node.id;

        self.insert(node)?;

        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.p.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl INodeStore for MemoNodeStore {
    /// Lookup a node from the store given the corresponding node-id
    fn lookup(&self, node_id: &Uuid) -> Option<Node> {
        return self
            .p
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(node_id)
            .cloned();
    }
}
