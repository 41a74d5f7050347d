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

//! Fixed-shape labeled tree stored as a flat arena.

pub mod builder;
pub mod node;

pub use builder::TreeBuilder;
pub use node::{Node, NodeId, UserId};

use std::collections::{HashMap, VecDeque};

/// Arena of nodes plus a label index.
///
/// The shape is frozen once [`TreeBuilder::build`] returns; only lock state
/// changes afterwards, and only through [`crate::engine::LockEngine`].
#[derive(Debug, Clone)]
pub struct LockTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<String, NodeId>,
}

impl LockTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Resolve a label to its node id.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    /// Resolve a label to its node.
    pub fn get(&self, label: &str) -> Option<&Node> {
        self.find(label).map(|id| self.node(id))
    }

    /// All nodes in construction (breadth-first) order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Proper ancestors of `id`, from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// Descendants of `id` in breadth-first order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            queue: self.node(id).children.iter().copied().collect(),
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        // The last node in breadth-first order sits on the deepest level.
        self.nodes
            .len()
            .checked_sub(1)
            .map(|last| self.ancestors(NodeId(last)).count())
            .unwrap_or(0)
    }

    /// Ids of all currently locked nodes, in construction order.
    pub fn locked_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, node)| node.is_locked())
            .map(|(id, _)| id)
    }
}

pub struct Ancestors<'a> {
    tree: &'a LockTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).parent;
        Some(current)
    }
}

pub struct Descendants<'a> {
    tree: &'a LockTree,
    queue: VecDeque<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.queue.pop_front()?;
        self.queue
            .extend(self.tree.node(current).children.iter().copied());
        Some(current)
    }
}
