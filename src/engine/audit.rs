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

//! Brute-force verification of the incrementally maintained lock counters.

use crate::tree::LockTree;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    AncestorLocked,
    DescendantLocked,
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counter::AncestorLocked => write!(f, "ancestor_locked"),
            Counter::DescendantLocked => write!(f, "descendant_locked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterViolation {
    pub label: String,
    pub counter: Counter,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for CounterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node '{}': {} is {} but {} locks were counted",
            self.label, self.counter, self.actual, self.expected
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub nodes_checked: usize,
    pub locked_nodes: usize,
    pub violations: Vec<CounterViolation>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Recompute both counters of every node from the lock flags alone and compare
/// them with the maintained values.
///
/// Node ids are assigned breadth-first, so every parent precedes its children.
/// One forward pass settles the ancestor counts and one backward pass the
/// descendant counts.
pub fn audit(tree: &LockTree) -> AuditReport {
    let mut expected_ancestor = vec![0usize; tree.len()];
    let mut expected_descendant = vec![0usize; tree.len()];

    for (id, node) in tree.iter() {
        if let Some(parent) = node.parent() {
            expected_ancestor[id.index()] = expected_ancestor[parent.index()]
                + usize::from(tree.node(parent).is_locked());
        }
    }

    for (id, node) in tree.iter().rev() {
        if let Some(parent) = node.parent() {
            expected_descendant[parent.index()] +=
                expected_descendant[id.index()] + usize::from(node.is_locked());
        }
    }

    let mut violations = Vec::new();
    for (id, node) in tree.iter() {
        let checks = [
            (
                Counter::AncestorLocked,
                expected_ancestor[id.index()],
                node.ancestor_locked(),
            ),
            (
                Counter::DescendantLocked,
                expected_descendant[id.index()],
                node.descendant_locked(),
            ),
        ];
        for (counter, expected, actual) in checks {
            if expected != actual {
                violations.push(CounterViolation {
                    label: node.label().to_string(),
                    counter,
                    expected,
                    actual,
                });
            }
        }
    }

    AuditReport {
        nodes_checked: tree.len(),
        locked_nodes: tree.locked_nodes().count(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    #[test]
    fn test_fresh_tree_is_clean() {
        let tree = TreeBuilder::new(3).build(["a", "b", "c", "d", "e"]).unwrap();
        let report = audit(&tree);
        assert!(report.is_clean());
        assert_eq!(report.nodes_checked, 5);
        assert_eq!(report.locked_nodes, 0);
    }

    #[test]
    fn test_counts_locks_at_several_depths() {
        // a -> (b, c), b -> (d, e), c -> (f, g), d -> (h, i)
        let mut tree = TreeBuilder::new(2)
            .build(["a", "b", "c", "d", "e", "f", "g", "h", "i"])
            .unwrap();
        for label in ["h", "e", "c"] {
            let id = tree.find(label).unwrap();
            tree.node_mut(id).owner = Some(3);
            crate::engine::traversal::adjust_ancestors(&mut tree, id, 1);
            crate::engine::traversal::adjust_descendants(&mut tree, id, 1);
        }

        let report = audit(&tree);
        assert!(report.is_clean(), "{:?}", report.violations);
        assert_eq!(report.locked_nodes, 3);
        assert_eq!(tree.get("a").unwrap().descendant_locked(), 3);
        assert_eq!(tree.get("b").unwrap().descendant_locked(), 2);
        assert_eq!(tree.get("g").unwrap().ancestor_locked(), 1);
    }

    #[test]
    fn test_detects_stale_counters() {
        let mut tree = TreeBuilder::new(2).build(["a", "b", "c"]).unwrap();
        let b = tree.find("b").unwrap();
        // Lock b without touching any counter.
        tree.node_mut(b).owner = Some(1);

        let report = audit(&tree);
        assert_eq!(report.locked_nodes, 1);
        assert_eq!(
            report.violations,
            vec![CounterViolation {
                label: "a".to_string(),
                counter: Counter::DescendantLocked,
                expected: 1,
                actual: 0,
            }]
        );
        assert!(report.violations[0].to_string().contains("descendant_locked is 0"));
    }
}
