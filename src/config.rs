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

use crate::engine::UpgradeStrategy;
use crate::error::{Result, TreelockError};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";
const ENV_PREFIX: &str = "TREELOCK";
const HOME_ENV: &str = "TREELOCK_HOME";
const DEFAULT_HOME_DIR: &str = ".treelock";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TreelockConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(skip)]
    treelock_home: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub upgrade_strategy: UpgradeStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TreeConfig {
    /// Fail on a repeated label instead of letting the later node win.
    #[serde(default)]
    pub reject_duplicate_labels: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Flush after every result line instead of once at the end.
    #[serde(default)]
    pub flush_each_result: bool,
}

impl TreelockConfig {
    /// Load configuration rooted at `treelock_home`.
    ///
    /// Sources, lowest priority first: built-in defaults, `config.toml` in the
    /// home directory, then `TREELOCK_<SECTION>__<KEY>` environment variables.
    pub fn load(treelock_home: &Path) -> Result<Self> {
        let config_path = treelock_home.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            log::debug!("Loading config from {config_path:?}");
        } else {
            log::debug!("Config file not found at {config_path:?}, using defaults");
        }

        let settings = Config::builder()
            .set_default(
                "engine.upgrade_strategy",
                UpgradeStrategy::default().to_string(),
            )?
            .set_default("tree.reject_duplicate_labels", false)?
            .set_default("output.flush_each_result", false)?
            .add_source(
                File::from(config_path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: TreelockConfig = settings.try_deserialize()?;
        config.treelock_home = treelock_home.to_path_buf();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        fs::write(&config_path, contents)?;
        log::debug!("Saved config to {config_path:?}");
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TreelockError::ConfigError(format!("Failed to serialize config: {e}")))
    }

    pub fn treelock_home(&self) -> &Path {
        &self.treelock_home
    }

    pub fn config_path(&self) -> PathBuf {
        self.treelock_home.join(CONFIG_FILE_NAME)
    }
}

/// Resolve the home directory and load the configuration found there.
pub fn new_treelock_config() -> Result<TreelockConfig> {
    let home = resolve_treelock_home()?;
    TreelockConfig::load(&home)
}

fn resolve_treelock_home() -> Result<PathBuf> {
    if let Ok(home) = env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOME_DIR))
        .ok_or_else(|| {
            TreelockError::ConfigError(format!(
                "Unable to determine the home directory; set {HOME_ENV}"
            ))
        })
}
