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

mod context;
mod exit_codes;
mod format;
#[cfg(test)]
mod tests;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreelockError {
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid token '{token}': expected {expected}")]
    InvalidToken { token: String, expected: String },

    #[error("Invalid operation code '{0}'")]
    InvalidOperation(String),

    #[error("Header declares {declared} {what} but {actual} were found")]
    CountMismatch {
        what: String,
        declared: usize,
        actual: usize,
    },

    #[error("Tree has no nodes")]
    EmptyTree,

    #[error("Fan-out of 0 cannot build a tree of {node_count} nodes")]
    ZeroFanOut { node_count: usize },

    #[error("Duplicate node label '{0}'")]
    DuplicateLabel(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lock counters are inconsistent on {count} node(s)")]
    InvariantViolation { count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, TreelockError>;
