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
use crate::tree::UserId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Lock,
    Unlock,
    Upgrade,
}

impl Operation {
    /// Numeric code used by the query input format.
    pub fn code(self) -> u8 {
        match self {
            Operation::Lock => 1,
            Operation::Unlock => 2,
            Operation::Upgrade => 3,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = TreelockError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Operation::Lock),
            2 => Ok(Operation::Unlock),
            3 => Ok(Operation::Upgrade),
            _ => Err(TreelockError::InvalidOperation(code.to_string())),
        }
    }
}

impl FromStr for Operation {
    type Err = TreelockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map_err(|_| TreelockError::InvalidOperation(s.to_string()))
            .and_then(Operation::try_from)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Lock => write!(f, "lock"),
            Operation::Unlock => write!(f, "unlock"),
            Operation::Upgrade => write!(f, "upgrade"),
        }
    }
}

/// One request against the lock engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub operation: Operation,
    pub label: String,
    pub user: UserId,
}

impl Query {
    pub fn new(operation: Operation, label: impl Into<String>, user: UserId) -> Self {
        Self {
            operation,
            label: label.into(),
            user,
        }
    }

    pub fn lock(label: impl Into<String>, user: UserId) -> Self {
        Self::new(Operation::Lock, label, user)
    }

    pub fn unlock(label: impl Into<String>, user: UserId) -> Self {
        Self::new(Operation::Unlock, label, user)
    }

    pub fn upgrade(label: impl Into<String>, user: UserId) -> Self {
        Self::new(Operation::Upgrade, label, user)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' by user {}", self.operation, self.label, self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_codes() {
        assert_eq!("1".parse::<Operation>().unwrap(), Operation::Lock);
        assert_eq!("2".parse::<Operation>().unwrap(), Operation::Unlock);
        assert_eq!("3".parse::<Operation>().unwrap(), Operation::Upgrade);
        for op in [Operation::Lock, Operation::Unlock, Operation::Upgrade] {
            assert_eq!(Operation::try_from(op.code()).unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operation_codes() {
        for code in ["0", "4", "-1", "lock", ""] {
            match code.parse::<Operation>() {
                Err(TreelockError::InvalidOperation(raw)) => assert_eq!(raw, code),
                other => panic!("expected invalid operation for {code:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_query_display() {
        let query = Query::upgrade("Asia", 9);
        assert_eq!(query.to_string(), "upgrade 'Asia' by user 9");
    }
}
