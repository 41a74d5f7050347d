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

//! Hierarchical lock engine.
//!
//! Each node tracks how many of its proper ancestors and how many of its
//! descendants are locked, so every legality check reads only the node itself.
//! Updating the counters costs one walk up the ancestor chain and one walk over
//! the subtree of the node whose lock state changed.

pub mod audit;
pub mod operation;
pub mod stats;
pub(crate) mod traversal;

pub use audit::{AuditReport, Counter, CounterViolation, audit};
pub use operation::{Operation, Query};
pub use stats::{EngineStats, OperationStats};

use crate::tree::{LockTree, Node, NodeId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use traversal::{LockedDescendants, adjust_ancestors, adjust_descendants};

/// How an upgrade releases the descendant locks it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeStrategy {
    /// Release every descendant and lock the target with a single combined
    /// update of the target's ancestor chain.
    #[default]
    Batched,
    /// Unlock each descendant through the regular unlock path, then lock the
    /// target. One ancestor-chain walk per released lock.
    Naive,
}

impl FromStr for UpgradeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "batched" => Ok(UpgradeStrategy::Batched),
            "naive" => Ok(UpgradeStrategy::Naive),
            other => Err(format!(
                "unknown upgrade strategy '{other}' (expected 'batched' or 'naive')"
            )),
        }
    }
}

impl fmt::Display for UpgradeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeStrategy::Batched => write!(f, "batched"),
            UpgradeStrategy::Naive => write!(f, "naive"),
        }
    }
}

/// Why an operation left the tree unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    UnknownLabel,
    AlreadyLocked,
    NotLocked,
    NotOwner { owner: UserId },
    AncestorLocked(usize),
    DescendantLocked(usize),
    NoLockedDescendants,
    ForeignDescendant { label: String, owner: UserId },
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::UnknownLabel => write!(f, "no node has this label"),
            Refusal::AlreadyLocked => write!(f, "node is already locked"),
            Refusal::NotLocked => write!(f, "node is not locked"),
            Refusal::NotOwner { owner } => write!(f, "node is locked by user {owner}"),
            Refusal::AncestorLocked(count) => write!(f, "{count} ancestor(s) locked"),
            Refusal::DescendantLocked(count) => write!(f, "{count} descendant(s) locked"),
            Refusal::NoLockedDescendants => write!(f, "no locked descendants to upgrade"),
            Refusal::ForeignDescendant { label, owner } => {
                write!(f, "descendant '{label}' is locked by user {owner}")
            }
        }
    }
}

/// Owns the tree and answers lock queries against it, one at a time.
#[derive(Debug, Clone)]
pub struct LockEngine {
    tree: LockTree,
    strategy: UpgradeStrategy,
    stats: EngineStats,
}

impl LockEngine {
    pub fn new(tree: LockTree) -> Self {
        Self::with_strategy(tree, UpgradeStrategy::default())
    }

    pub fn with_strategy(tree: LockTree, strategy: UpgradeStrategy) -> Self {
        Self {
            tree,
            strategy,
            stats: EngineStats::default(),
        }
    }

    pub fn tree(&self) -> &LockTree {
        &self.tree
    }

    pub fn strategy(&self) -> UpgradeStrategy {
        self.strategy
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Look up a node by label.
    pub fn node(&self, label: &str) -> Option<&Node> {
        self.tree.get(label)
    }

    pub fn lock(&mut self, label: &str, user: UserId) -> bool {
        self.try_lock(label, user).is_ok()
    }

    pub fn unlock(&mut self, label: &str, user: UserId) -> bool {
        self.try_unlock(label, user).is_ok()
    }

    pub fn upgrade(&mut self, label: &str, user: UserId) -> bool {
        self.try_upgrade(label, user).is_ok()
    }

    /// Dispatch a query to the matching operation.
    pub fn apply(&mut self, query: &Query) -> bool {
        match query.operation {
            Operation::Lock => self.lock(&query.label, query.user),
            Operation::Unlock => self.unlock(&query.label, query.user),
            Operation::Upgrade => self.upgrade(&query.label, query.user),
        }
    }

    /// Lock `label` for `user`, reporting why the lock was refused.
    pub fn try_lock(&mut self, label: &str, user: UserId) -> Result<(), Refusal> {
        let result = self
            .resolve(label)
            .and_then(|id| self.lock_node(id, user));
        self.finish(Operation::Lock, label, user, result)
    }

    /// Unlock `label` on behalf of `user`, reporting why the unlock was refused.
    pub fn try_unlock(&mut self, label: &str, user: UserId) -> Result<(), Refusal> {
        let result = self
            .resolve(label)
            .and_then(|id| self.unlock_node(id, user));
        self.finish(Operation::Unlock, label, user, result)
    }

    /// Replace every lock `user` holds below `label` with a single lock on
    /// `label`. Returns the number of descendant locks released.
    pub fn try_upgrade(&mut self, label: &str, user: UserId) -> Result<usize, Refusal> {
        let result = self
            .resolve(label)
            .and_then(|id| self.upgrade_node(id, user));
        if let Ok(released) = &result {
            self.stats.released_by_upgrade += *released as u64;
        }
        self.finish(Operation::Upgrade, label, user, result)
    }

    fn resolve(&self, label: &str) -> Result<NodeId, Refusal> {
        self.tree.find(label).ok_or(Refusal::UnknownLabel)
    }

    fn finish<T>(
        &mut self,
        operation: Operation,
        label: &str,
        user: UserId,
        result: Result<T, Refusal>,
    ) -> Result<T, Refusal> {
        self.stats.record(operation, result.is_ok());
        match &result {
            Ok(_) => log::trace!("{operation} '{label}' by user {user}: ok"),
            Err(refusal) => log::debug!("{operation} '{label}' by user {user} refused: {refusal}"),
        }
        result
    }

    fn lock_node(&mut self, id: NodeId, user: UserId) -> Result<(), Refusal> {
        let node = self.tree.node(id);
        if node.is_locked() {
            return Err(Refusal::AlreadyLocked);
        }
        if node.ancestor_locked > 0 {
            return Err(Refusal::AncestorLocked(node.ancestor_locked));
        }
        if node.descendant_locked > 0 {
            return Err(Refusal::DescendantLocked(node.descendant_locked));
        }

        adjust_ancestors(&mut self.tree, id, 1);
        adjust_descendants(&mut self.tree, id, 1);
        self.tree.node_mut(id).owner = Some(user);
        Ok(())
    }

    fn unlock_node(&mut self, id: NodeId, user: UserId) -> Result<(), Refusal> {
        match self.tree.node(id).owner {
            None => return Err(Refusal::NotLocked),
            Some(owner) if owner != user => return Err(Refusal::NotOwner { owner }),
            Some(_) => {}
        }

        adjust_ancestors(&mut self.tree, id, -1);
        adjust_descendants(&mut self.tree, id, -1);
        self.tree.node_mut(id).owner = None;
        Ok(())
    }

    fn upgrade_node(&mut self, id: NodeId, user: UserId) -> Result<usize, Refusal> {
        let node = self.tree.node(id);
        if node.is_locked() {
            return Err(Refusal::AlreadyLocked);
        }
        if node.ancestor_locked > 0 {
            return Err(Refusal::AncestorLocked(node.ancestor_locked));
        }
        if node.descendant_locked == 0 {
            return Err(Refusal::NoLockedDescendants);
        }

        // Validation completes before anything is written, so a foreign lock
        // found deep in the subtree leaves the tree untouched.
        let found = traversal::collect_locked_descendants(&self.tree, id, user)?;
        let released = found.locked.len();

        match self.strategy {
            UpgradeStrategy::Batched => self.commit_batched(id, user, &found),
            UpgradeStrategy::Naive => self.commit_naive(id, user, &found)?,
        }
        Ok(released)
    }

    fn commit_batched(&mut self, id: NodeId, user: UserId, found: &LockedDescendants) {
        for &descendant in &found.locked {
            self.tree.node_mut(descendant).owner = None;
            adjust_descendants(&mut self.tree, descendant, -1);
        }
        // Every lock below the target is gone, so each node on the paths the
        // collection walked now has nothing locked beneath it.
        for &interior in &found.interior {
            self.tree.node_mut(interior).descendant_locked = 0;
        }

        // Net change for the target's ancestors: -1 per released lock, +1 for
        // the target itself.
        let net = 1 - found.locked.len() as isize;
        adjust_ancestors(&mut self.tree, id, net);
        adjust_descendants(&mut self.tree, id, 1);
        self.tree.node_mut(id).owner = Some(user);
    }

    fn commit_naive(
        &mut self,
        id: NodeId,
        user: UserId,
        found: &LockedDescendants,
    ) -> Result<(), Refusal> {
        for &descendant in &found.locked {
            self.unlock_node(descendant, user)?;
        }
        self.lock_node(id, user)
    }
}
