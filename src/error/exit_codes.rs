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

pub fn get_exit_code(error: &TreelockError) -> i32 {
    match error {
        TreelockError::UnexpectedEof { .. }
        | TreelockError::InvalidToken { .. }
        | TreelockError::InvalidOperation(_)
        | TreelockError::CountMismatch { .. }
        | TreelockError::EmptyTree
        | TreelockError::ZeroFanOut { .. }
        | TreelockError::DuplicateLabel(_)
        | TreelockError::ConfigError(_)
        | TreelockError::Config(_) => 2,

        TreelockError::InvariantViolation { .. } => 3,

        _ => 1,
    }
}
