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

//! Property-based tests for the lock engine.
//!
//! Random trees receive random query streams; the maintained counters are
//! checked against brute-force recomputation and against the naive upgrade
//! strategy after every query.

use proptest::prelude::*;

use treelock::engine::{LockEngine, Operation, Query, UpgradeStrategy, audit};
use treelock::tree::{LockTree, NodeId, TreeBuilder, UserId};

type Snapshot = Vec<(Option<UserId>, usize, usize)>;

fn build_tree(size: usize, fan_out: usize) -> LockTree {
    TreeBuilder::new(fan_out)
        .build((0..size).map(|i| format!("n{i}")))
        .unwrap()
}

fn snapshot(engine: &LockEngine) -> Snapshot {
    engine
        .tree()
        .iter()
        .map(|(_, node)| {
            (
                node.owner(),
                node.ancestor_locked(),
                node.descendant_locked(),
            )
        })
        .collect()
}

fn has_locked_relative(tree: &LockTree, id: NodeId) -> bool {
    tree.ancestors(id).any(|a| tree.node(a).is_locked())
        || tree.descendants(id).any(|d| tree.node(d).is_locked())
}

/// Strategy for a tree shape plus a query stream over its labels.
fn scenario() -> impl Strategy<Value = (usize, usize, Vec<Query>)> {
    (1usize..40, 1usize..5).prop_flat_map(|(size, fan_out)| {
        let query = (0u8..3, 0..size + 1, 1i64..4).prop_map(move |(op, node, user)| {
            let operation = match op {
                0 => Operation::Lock,
                1 => Operation::Unlock,
                _ => Operation::Upgrade,
            };
            // One index past the end exercises unknown labels.
            Query::new(operation, format!("n{node}"), user)
        });
        (
            Just(size),
            Just(fan_out),
            prop::collection::vec(query, 0..120),
        )
    })
}

proptest! {
    /// Counters always match a full recomputation from the lock flags.
    #[test]
    fn counters_match_brute_force((size, fan_out, queries) in scenario()) {
        let mut engine = LockEngine::new(build_tree(size, fan_out));
        for query in &queries {
            engine.apply(query);
            let report = audit(engine.tree());
            prop_assert!(report.is_clean(), "after {}: {:?}", query, report.violations);
        }
    }

    /// Batched and naive upgrades agree on every answer and every node.
    #[test]
    fn batched_matches_naive((size, fan_out, queries) in scenario()) {
        let mut batched = LockEngine::with_strategy(build_tree(size, fan_out), UpgradeStrategy::Batched);
        let mut naive = LockEngine::with_strategy(build_tree(size, fan_out), UpgradeStrategy::Naive);
        for query in &queries {
            prop_assert_eq!(batched.apply(query), naive.apply(query), "{}", query);
            prop_assert_eq!(snapshot(&batched), snapshot(&naive));
        }
    }

    /// A refused operation leaves every node exactly as it was.
    #[test]
    fn refusals_do_not_mutate((size, fan_out, queries) in scenario()) {
        let mut engine = LockEngine::new(build_tree(size, fan_out));
        for query in &queries {
            let before = snapshot(&engine);
            if !engine.apply(query) {
                prop_assert_eq!(&before, &snapshot(&engine), "{}", query);
            }
        }
    }

    /// Lock succeeds exactly when the node and all its relatives are unlocked.
    #[test]
    fn lock_requires_free_neighbourhood((size, fan_out, queries) in scenario()) {
        let mut engine = LockEngine::new(build_tree(size, fan_out));
        for query in &queries {
            if query.operation == Operation::Lock {
                if let Some(id) = engine.tree().find(&query.label) {
                    let tree = engine.tree();
                    let expected = !tree.node(id).is_locked() && !has_locked_relative(tree, id);
                    prop_assert_eq!(engine.apply(query), expected, "{}", query);
                    continue;
                }
            }
            engine.apply(query);
        }
    }

    /// Lock followed by unlock from the same user restores every counter.
    #[test]
    fn lock_unlock_round_trip((size, fan_out, queries) in scenario(), target in 0usize..40, user in 1i64..4) {
        let mut engine = LockEngine::new(build_tree(size, fan_out));
        for query in &queries {
            engine.apply(query);
        }

        let label = format!("n{}", target % size);
        let before = snapshot(&engine);
        if engine.lock(&label, user) {
            prop_assert!(engine.unlock(&label, user));
            prop_assert_eq!(before, snapshot(&engine));
        }
    }
}

#[test]
fn upgrade_releases_every_owned_descendant() {
    // n0 -> (n1, n2, n3); n1 -> (n4, n5, n6); n2 -> (n7, n8, n9)
    let mut engine = LockEngine::new(build_tree(10, 3));
    for label in ["n4", "n6", "n8", "n3"] {
        assert!(engine.lock(label, 7));
    }

    assert_eq!(engine.try_upgrade("n0", 7), Ok(4));
    let locked: Vec<&str> = engine
        .tree()
        .locked_nodes()
        .map(|id| engine.tree().node(id).label())
        .collect();
    assert_eq!(locked, vec!["n0"]);
    assert!(audit(engine.tree()).is_clean());
}
