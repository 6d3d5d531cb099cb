// Copyright 2023 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The store module holds the nodes enrolled with the backend.  The
//! pipeline only needs the [`INodeStore`] lookup capability;
//! [`MemoNodeStore`] is an in-memory implementation suitable for tests and
//! for the command-line tool.

pub use self::errors::Error;
pub use self::inodestore::INodeStore;
pub use self::memo_nodestore::MemoNodeStore;
pub use self::node::Node;

mod errors;
mod inodestore;
mod memo_nodestore;
mod node;
