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

use crate::error::TreelockError;
use std::fmt;

const INPUT_FORMAT_HINT: &str = "Input format: '<nodes> <fan-out> <queries>', then one label \
                                 per node, then one '<op> <label> <user>' triple per query \
                                 (op 1 = lock, 2 = unlock, 3 = upgrade).";

pub struct ErrorContext<'a> {
    pub error: &'a TreelockError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a TreelockError) -> Self {
        let (suggestion, details) = match error {
            TreelockError::UnexpectedEof { expected } => {
                let suggestion = Some(INPUT_FORMAT_HINT.to_string());
                let details = Some(format!(
                    "The input ended while reading {expected}. Check that the counts in the \
                     header match the labels and queries that follow."
                ));
                (suggestion, details)
            }
            TreelockError::InvalidToken { token, expected } => {
                let suggestion = Some(INPUT_FORMAT_HINT.to_string());
                let details = Some(format!("Could not read '{token}' as {expected}."));
                (suggestion, details)
            }
            TreelockError::InvalidOperation(code) => {
                let suggestion = Some(
                    "Use 1 to lock, 2 to unlock and 3 to upgrade a node.".to_string(),
                );
                let details = Some(format!("Operation code '{code}' is not recognized."));
                (suggestion, details)
            }
            TreelockError::CountMismatch {
                what,
                declared,
                actual,
            } => {
                let suggestion = Some(format!(
                    "Update the header to declare {actual} {what} or supply the missing entries."
                ));
                let details = Some(format!("Declared {declared}, found {actual}."));
                (suggestion, details)
            }
            TreelockError::EmptyTree => {
                let suggestion = Some("Provide at least one node label for the root.".to_string());
                (suggestion, None)
            }
            TreelockError::ZeroFanOut { node_count } => {
                let suggestion =
                    Some("Use a fan-out of at least 1 when the tree has more than one node.".to_string());
                let details = Some(format!(
                    "{} node(s) would have no parent.",
                    node_count.saturating_sub(1)
                ));
                (suggestion, details)
            }
            TreelockError::DuplicateLabel(label) => {
                let enable_cmd = if cfg!(windows) {
                    "set TREELOCK_TREE__REJECT_DUPLICATE_LABELS=false"
                } else {
                    "export TREELOCK_TREE__REJECT_DUPLICATE_LABELS=false"
                };
                let suggestion = Some(format!(
                    "Rename one of the nodes labeled '{label}', or let the later node win: \
                     {enable_cmd}"
                ));
                (suggestion, None)
            }
            TreelockError::ConfigError(msg) => {
                let suggestion = Some(
                    "Check config.toml in the treelock home directory (TREELOCK_HOME or \
                     ~/.treelock)."
                        .to_string(),
                );
                let details = Some(format!("Configuration problem: {msg}"));
                (suggestion, details)
            }
            TreelockError::Config(err) => {
                let suggestion = Some(
                    "Valid keys: engine.upgrade_strategy (batched|naive), \
                     tree.reject_duplicate_labels, output.flush_each_result."
                        .to_string(),
                );
                let details = Some(format!("Failed to load configuration: {err}"));
                (suggestion, details)
            }
            TreelockError::InvariantViolation { .. } => {
                let suggestion = Some(
                    "Re-run with --strategy naive to check whether the batched upgrade path is \
                     responsible, and use -vv to log every refused operation."
                        .to_string(),
                );
                (suggestion, None)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
