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
use crate::engine::{EngineStats, UpgradeStrategy};
use crate::error::Result;
use crate::input::ProblemInput;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub struct RunCommand<'a> {
    config: &'a TreelockConfig,
}

impl<'a> RunCommand<'a> {
    pub fn new(config: &'a TreelockConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, input: Option<&Path>, strategy: Option<UpgradeStrategy>) -> Result<()> {
        let text = read_input(input)?;
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());

        let stats = self.process(&text, strategy, &mut out)?;
        out.flush()?;

        log::info!("{stats}");
        Ok(())
    }

    /// Answer every query in `text`, writing one `true`/`false` line per query.
    ///
    /// Results already written stay written when a later query is malformed.
    pub fn process<W: Write>(
        &self,
        text: &str,
        strategy: Option<UpgradeStrategy>,
        out: &mut W,
    ) -> Result<EngineStats> {
        let input = ProblemInput::parse(text)?;
        let mut engine = build_engine(self.config, &input, strategy)?;
        let flush_each = self.config.output.flush_each_result;

        for query in input.queries() {
            let query = query?;
            let granted = engine.apply(&query);
            writeln!(out, "{granted}")?;
            if flush_each {
                out.flush()?;
            }
        }

        Ok(*engine.stats())
    }
}
