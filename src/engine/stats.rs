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

use crate::engine::Operation;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub attempted: u64,
    pub succeeded: u64,
}

impl OperationStats {
    pub fn refused(&self) -> u64 {
        self.attempted - self.succeeded
    }
}

/// Running totals of the queries an engine has answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub lock: OperationStats,
    pub unlock: OperationStats,
    pub upgrade: OperationStats,
    /// Descendant locks released by successful upgrades.
    pub released_by_upgrade: u64,
}

impl EngineStats {
    pub(crate) fn record(&mut self, operation: Operation, succeeded: bool) {
        let entry = match operation {
            Operation::Lock => &mut self.lock,
            Operation::Unlock => &mut self.unlock,
            Operation::Upgrade => &mut self.upgrade,
        };
        entry.attempted += 1;
        if succeeded {
            entry.succeeded += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.lock.attempted + self.unlock.attempted + self.upgrade.attempted
    }
}

impl fmt::Display for EngineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} queries: lock {}/{}, unlock {}/{}, upgrade {}/{} ({} descendant locks released)",
            self.total(),
            self.lock.succeeded,
            self.lock.attempted,
            self.unlock.succeeded,
            self.unlock.attempted,
            self.upgrade.succeeded,
            self.upgrade.attempted,
            self.released_by_upgrade
        )
    }
}
