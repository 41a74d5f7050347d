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

pub mod audit;
pub mod config_cmd;
pub mod run;

use crate::config::TreelockConfig;
use crate::engine::{LockEngine, UpgradeStrategy};
use crate::error::Result;
use crate::input::ProblemInput;
use crate::tree::TreeBuilder;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read the whole problem from `path`, or from stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            log::debug!("Reading input from {path:?}");
            Ok(fs::read_to_string(path)?)
        }
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Build the tree described by `input` and wrap it in an engine.
///
/// An explicit `strategy` wins over the configured one.
pub(crate) fn build_engine(
    config: &TreelockConfig,
    input: &ProblemInput<'_>,
    strategy: Option<UpgradeStrategy>,
) -> Result<LockEngine> {
    let tree = TreeBuilder::new(input.header.fan_out)
        .reject_duplicate_labels(config.tree.reject_duplicate_labels)
        .build(&input.labels)?;
    let strategy = strategy.unwrap_or(config.engine.upgrade_strategy);
    log::debug!("Using {strategy} upgrade strategy");
    Ok(LockEngine::with_strategy(tree, strategy))
}
