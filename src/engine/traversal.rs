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

//! Counter propagation walks shared by the lock operations.
//!
//! Every walk uses an explicit worklist so traversal depth is bounded by the
//! node count rather than by the call stack.

use crate::engine::Refusal;
use crate::tree::{LockTree, NodeId, UserId};
use std::collections::VecDeque;

/// Locked descendants found under an upgrade target.
#[derive(Debug, Default)]
pub(crate) struct LockedDescendants {
    /// Locked nodes, all owned by the requesting user, in breadth-first order.
    pub locked: Vec<NodeId>,
    /// Nodes whose `descendant_locked` was non-zero when visited, the target
    /// included. Releasing every lock in `locked` drops each of these to zero.
    pub interior: Vec<NodeId>,
}

fn shifted(count: usize, delta: isize) -> usize {
    debug_assert!(
        count.checked_add_signed(delta).is_some(),
        "lock counter {count} cannot absorb delta {delta}"
    );
    count.saturating_add_signed(delta)
}

/// Apply `delta` to `descendant_locked` on every proper ancestor of `id`.
pub(crate) fn adjust_ancestors(tree: &mut LockTree, id: NodeId, delta: isize) {
    if delta == 0 {
        return;
    }
    let mut current = tree.node(id).parent;
    while let Some(ancestor) = current {
        let node = tree.node_mut(ancestor);
        node.descendant_locked = shifted(node.descendant_locked, delta);
        current = node.parent;
    }
}

/// Apply `delta` to `ancestor_locked` on every descendant of `id`.
pub(crate) fn adjust_descendants(tree: &mut LockTree, id: NodeId, delta: isize) {
    let mut queue: VecDeque<NodeId> = tree.node(id).children.iter().copied().collect();
    while let Some(current) = queue.pop_front() {
        let node = tree.node_mut(current);
        node.ancestor_locked = shifted(node.ancestor_locked, delta);
        queue.extend(node.children.iter().copied());
    }
}

/// Collect every locked descendant of `id`, requiring each to be owned by `user`.
///
/// Subtrees under a node with `descendant_locked == 0` are skipped. The walk
/// stops at the first lock held by someone else.
pub(crate) fn collect_locked_descendants(
    tree: &LockTree,
    id: NodeId,
    user: UserId,
) -> Result<LockedDescendants, Refusal> {
    let mut found = LockedDescendants::default();
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        let node = tree.node(current);

        if current != id {
            if let Some(owner) = node.owner {
                if owner != user {
                    return Err(Refusal::ForeignDescendant {
                        label: node.label.clone(),
                        owner,
                    });
                }
                found.locked.push(current);
            }
        }

        if node.descendant_locked > 0 {
            found.interior.push(current);
            queue.extend(node.children.iter().copied());
        }
    }

    Ok(found)
}
