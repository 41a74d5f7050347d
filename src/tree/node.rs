// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;
use std::fmt;

/// Identifier of the user holding a lock.
pub type UserId = i64;

/// Position of a node inside the tree arena.
///
/// Ids are assigned in breadth-first construction order, so the root is always
/// `NodeId(0)` and a parent always has a smaller id than its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A labeled tree node with its lock state.
///
/// Shape fields never change after construction. Lock fields are only written by
/// the lock engine, which keeps the two counters consistent with the lock flags
/// of the rest of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) label: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) owner: Option<UserId>,
    pub(crate) ancestor_locked: usize,
    pub(crate) descendant_locked: usize,
}

impl Node {
    pub(crate) fn new(label: String, parent: Option<NodeId>) -> Self {
        Self {
            label,
            parent,
            children: Vec::new(),
            owner: None,
            ancestor_locked: 0,
            descendant_locked: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_locked(&self) -> bool {
        self.owner.is_some()
    }

    /// The user holding the lock, if the node is locked.
    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// Number of proper ancestors currently locked.
    pub fn ancestor_locked(&self) -> usize {
        self.ancestor_locked
    }

    /// Number of descendants currently locked.
    pub fn descendant_locked(&self) -> usize {
        self.descendant_locked
    }
}
