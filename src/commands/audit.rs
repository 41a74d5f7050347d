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

use crate::commands::{build_engine, read_input};
use crate::config::TreelockConfig;
use crate::engine::{AuditReport, EngineStats, UpgradeStrategy, audit};
use crate::error::{Result, TreelockError};
use crate::input::ProblemInput;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct AuditOutput {
    pub strategy: UpgradeStrategy,
    pub stats: EngineStats,
    #[serde(flatten)]
    pub report: AuditReport,
}

pub struct AuditCommand<'a> {
    config: &'a TreelockConfig,
}

impl<'a> AuditCommand<'a> {
    pub fn new(config: &'a TreelockConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(
        &self,
        input: Option<&Path>,
        strategy: Option<UpgradeStrategy>,
        json: bool,
    ) -> Result<()> {
        let text = read_input(input)?;
        let output = self.process(&text, strategy)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_report(&output);
        }

        if output.report.is_clean() {
            Ok(())
        } else {
            Err(TreelockError::InvariantViolation {
                count: output.report.violations.len(),
            })
        }
    }

    /// Apply every query, then recompute all counters from scratch.
    pub fn process(&self, text: &str, strategy: Option<UpgradeStrategy>) -> Result<AuditOutput> {
        let input = ProblemInput::parse(text)?;
        let mut engine = build_engine(self.config, &input, strategy)?;

        for query in input.queries() {
            engine.apply(&query?);
        }

        let report = audit(engine.tree());
        log::info!(
            "Audited {} nodes, {} locked, {} violation(s)",
            report.nodes_checked,
            report.locked_nodes,
            report.violations.len()
        );

        Ok(AuditOutput {
            strategy: engine.strategy(),
            stats: *engine.stats(),
            report,
        })
    }
}

fn print_report(output: &AuditOutput) {
    println!("Strategy: {}", output.strategy);
    println!("Queries: {}", output.stats);
    println!(
        "Nodes: {} checked, {} locked",
        output.report.nodes_checked, output.report.locked_nodes
    );

    if output.report.is_clean() {
        println!("All lock counters are consistent");
        return;
    }

    println!("Counter violations:");
    for violation in &output.report.violations {
        println!("  {violation}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_after_upgrades_is_clean() {
        let config = TreelockConfig::default();
        let command = AuditCommand::new(&config).unwrap();
        let text = "7 2 6\na b c d e f g\n1 d 1\n1 e 1\n1 g 1\n3 b 1\n3 a 1\n2 a 1\n";

        for strategy in [UpgradeStrategy::Batched, UpgradeStrategy::Naive] {
            let output = command.process(text, Some(strategy)).unwrap();
            assert!(output.report.is_clean(), "{strategy}: {:?}", output.report);
            assert_eq!(output.strategy, strategy);
            assert_eq!(output.report.locked_nodes, 0);
            assert_eq!(output.stats.released_by_upgrade, 4);
        }
    }

    #[test]
    fn test_audit_json_shape() {
        let config = TreelockConfig::default();
        let command = AuditCommand::new(&config).unwrap();
        let output = command.process("2 1 1\nroot leaf\n1 leaf 3\n", None).unwrap();

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["strategy"], "batched");
        assert_eq!(value["nodes_checked"], 2);
        assert_eq!(value["locked_nodes"], 1);
        assert_eq!(value["stats"]["lock"]["succeeded"], 1);
        assert!(value["violations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_audit_propagates_input_errors() {
        let config = TreelockConfig::default();
        let command = AuditCommand::new(&config).unwrap();
        let result = command.process("2 1 1\nroot\n", None);
        assert!(matches!(result, Err(TreelockError::CountMismatch { .. })));
    }
}
