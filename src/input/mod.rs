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

//! Reader for the whitespace-separated problem format.
//!
//! ```text
//! <node count> <fan-out> <query count>
//! <label> x node count
//! <op> <label> <user> x query count
//! ```
//!
//! Queries are yielded lazily so results can be written while the rest of the
//! input is still being parsed.

use crate::engine::{Operation, Query};
use crate::error::{Result, TreelockError};
use crate::tree::UserId;
use std::str::{FromStr, SplitWhitespace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub node_count: usize,
    pub fan_out: usize,
    pub query_count: usize,
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next_token(&mut self, expected: impl FnOnce() -> String) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| TreelockError::UnexpectedEof {
                expected: expected(),
            })
    }

    fn next_parsed<T: FromStr>(&mut self, expected: &str) -> Result<T> {
        let token = self.next_token(|| expected.to_string())?;
        token.parse().map_err(|_| TreelockError::InvalidToken {
            token: token.to_string(),
            expected: expected.to_string(),
        })
    }
}

/// Parsed header and labels, with the queries still pending.
pub struct ProblemInput<'a> {
    pub header: Header,
    pub labels: Vec<String>,
    tokens: Tokens<'a>,
}

impl<'a> ProblemInput<'a> {
    pub fn parse(text: &'a str) -> Result<Self> {
        let mut tokens = Tokens {
            inner: text.split_whitespace(),
        };

        let header = Header {
            node_count: tokens.next_parsed("node count")?,
            fan_out: tokens.next_parsed("fan-out")?,
            query_count: tokens.next_parsed("query count")?,
        };
        log::debug!(
            "Header: {} nodes, fan-out {}, {} queries",
            header.node_count,
            header.fan_out,
            header.query_count
        );

        // A bogus header must not drive the allocation.
        let mut labels = Vec::with_capacity(header.node_count.min(text.len()));
        for position in 0..header.node_count {
            match tokens.inner.next() {
                Some(label) => labels.push(label.to_string()),
                None => {
                    return Err(TreelockError::CountMismatch {
                        what: "node labels".to_string(),
                        declared: header.node_count,
                        actual: position,
                    });
                }
            }
        }

        Ok(Self {
            header,
            labels,
            tokens,
        })
    }

    /// Iterate over the declared number of queries.
    pub fn queries(self) -> Queries<'a> {
        Queries {
            tokens: self.tokens,
            declared: self.header.query_count,
            read: 0,
            done: false,
        }
    }
}

pub struct Queries<'a> {
    tokens: Tokens<'a>,
    declared: usize,
    read: usize,
    done: bool,
}

impl Queries<'_> {
    fn read_query(&mut self) -> Result<Query> {
        let number = self.read + 1;
        let code = self.tokens.next_token(|| format!("operation of query {number}"))?;
        let operation = code.parse::<Operation>()?;
        let label = self.tokens.next_token(|| format!("label of query {number}"))?;
        let user: UserId = self.tokens.next_parsed("user id")?;
        Ok(Query::new(operation, label, user))
    }
}

impl Iterator for Queries<'_> {
    type Item = Result<Query>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.read == self.declared {
            if self.tokens.inner.next().is_some() {
                log::warn!("Ignoring input after the {} declared queries", self.declared);
            }
            self.done = true;
            return None;
        }

        // Running out exactly on a query boundary means the header over-counted.
        let result = if self.tokens.inner.clone().next().is_none() {
            Err(TreelockError::CountMismatch {
                what: "queries".to_string(),
                declared: self.declared,
                actual: self.read,
            })
        } else {
            self.read_query()
        };
        self.read += 1;
        self.done = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.declared.saturating_sub(self.read)))
    }
}
