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

use crate::error::{Result, TreelockError};
use crate::tree::LockTree;
use crate::tree::node::{Node, NodeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Builds a complete `fan_out`-ary tree from labels in breadth-first order.
///
/// The first label becomes the root; every following label is attached to the
/// earliest node that still has fewer than `fan_out` children.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    fan_out: usize,
    reject_duplicate_labels: bool,
}

impl TreeBuilder {
    pub fn new(fan_out: usize) -> Self {
        Self {
            fan_out,
            reject_duplicate_labels: false,
        }
    }

    /// Fail the build instead of letting a later duplicate shadow an earlier one.
    pub fn reject_duplicate_labels(mut self, reject: bool) -> Self {
        self.reject_duplicate_labels = reject;
        self
    }

    pub fn build<I, S>(&self, labels: I) -> Result<LockTree>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(TreelockError::EmptyTree);
        }
        if self.fan_out == 0 && labels.len() > 1 {
            return Err(TreelockError::ZeroFanOut {
                node_count: labels.len(),
            });
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(labels.len());
        for (position, label) in labels.into_iter().enumerate() {
            let id = NodeId(position);

            // Breadth-first filling puts the i-th non-root node under node (i - 1) / m.
            let parent = match position {
                0 => None,
                _ => Some(NodeId((position - 1) / self.fan_out)),
            };
            if let Some(parent) = parent {
                nodes[parent.0].children.push(id);
            }
            nodes.push(Node::new(label, parent));
        }

        let index = self.index_labels(&nodes)?;
        let tree = LockTree { nodes, index };
        log::info!(
            "Built tree with {} nodes (fan-out {}, height {})",
            tree.len(),
            self.fan_out,
            tree.height()
        );
        Ok(tree)
    }

    /// Map labels to nodes, visiting the tree in depth-first preorder.
    ///
    /// When a label repeats, the node visited last in preorder owns it.
    fn index_labels(&self, nodes: &[Node]) -> Result<HashMap<String, NodeId>> {
        let mut index: HashMap<String, NodeId> = HashMap::with_capacity(nodes.len());
        let mut stack = vec![NodeId(0)];

        while let Some(id) = stack.pop() {
            let node = &nodes[id.0];
            match index.entry(node.label.clone()) {
                Entry::Occupied(mut entry) => {
                    if self.reject_duplicate_labels {
                        return Err(TreelockError::DuplicateLabel(node.label.clone()));
                    }
                    log::warn!(
                        "Duplicate label '{}': node {id} shadows node {}",
                        node.label,
                        entry.get()
                    );
                    entry.insert(id);
                }
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
            stack.extend(node.children.iter().rev().copied());
        }

        Ok(index)
    }
}
