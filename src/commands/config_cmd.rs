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

use crate::config::TreelockConfig;
use crate::error::Result;

pub struct ConfigCommand<'a> {
    config: &'a TreelockConfig,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(config: &'a TreelockConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, json: bool, save: bool) -> Result<()> {
        println!("{}", self.render(json)?);

        if save {
            self.config.save()?;
            eprintln!("Saved configuration to {}", self.config.config_path().display());
        }
        Ok(())
    }

    /// Render the effective configuration, after file and environment overrides.
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(self.config)?);
        }

        Ok(format!(
            "# {}\n{}",
            self.config.config_path().display(),
            self.config.to_toml()?
        ))
    }
}
