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

use crate::error::format::format_error_with_color;
use crate::error::*;

#[test]
fn test_error_context_unexpected_eof() {
    let error = TreelockError::UnexpectedEof {
        expected: "label of node 3".to_string(),
    };
    let context = ErrorContext::new(&error);

    assert!(context.suggestion.unwrap().contains("op 1 = lock"));
    assert!(context.details.unwrap().contains("label of node 3"));
}

#[test]
fn test_error_context_invalid_operation() {
    let error = TreelockError::InvalidOperation("7".to_string());
    let context = ErrorContext::new(&error);

    assert!(context.suggestion.unwrap().contains("3 to upgrade"));
    assert!(context.details.unwrap().contains("'7'"));
}

#[test]
fn test_error_context_duplicate_label() {
    let error = TreelockError::DuplicateLabel("Asia".to_string());
    let context = ErrorContext::new(&error);

    let suggestion = context.suggestion.unwrap();
    assert!(suggestion.contains("'Asia'"));
    assert!(suggestion.contains("TREELOCK_TREE__REJECT_DUPLICATE_LABELS=false"));
}

#[test]
fn test_error_context_zero_fan_out() {
    let error = TreelockError::ZeroFanOut { node_count: 4 };
    let context = ErrorContext::new(&error);

    assert_eq!(context.details, Some("3 node(s) would have no parent.".to_string()));
}

#[test]
fn test_error_context_display() {
    let error = TreelockError::InvalidToken {
        token: "x".to_string(),
        expected: "user id".to_string(),
    };
    let output = ErrorContext::new(&error).to_string();

    assert!(output.contains("Error: Invalid token 'x'"));
    assert!(output.contains("Details:"));
    assert!(output.contains("Suggestion:"));
}

#[test]
fn test_error_context_io_has_no_suggestion() {
    let error = TreelockError::Io(std::io::Error::other("broken pipe"));
    let context = ErrorContext::new(&error);

    assert!(context.suggestion.is_none());
    assert_eq!(format_error_chain(&error), "Error: broken pipe");
}

#[test]
fn test_exit_codes() {
    assert_eq!(
        get_exit_code(&TreelockError::InvalidOperation("9".to_string())),
        2
    );
    assert_eq!(get_exit_code(&TreelockError::EmptyTree), 2);
    assert_eq!(
        get_exit_code(&TreelockError::CountMismatch {
            what: "queries".to_string(),
            declared: 3,
            actual: 1,
        }),
        2
    );
    assert_eq!(
        get_exit_code(&TreelockError::InvariantViolation { count: 2 }),
        3
    );
    assert_eq!(
        get_exit_code(&TreelockError::Io(std::io::Error::other("x"))),
        1
    );
}

#[test]
fn test_format_error_with_color() {
    let error = TreelockError::InvalidOperation("0".to_string());

    let plain = format_error_with_color(&error, false);
    assert!(plain.starts_with("Error: Invalid operation code '0'"));
    assert!(plain.contains("• Use 1 to lock"));
    assert!(!plain.contains("\x1b["));

    let colored = format_error_with_color(&error, true);
    assert!(colored.contains("\x1b[31m"));
    assert!(colored.ends_with("\x1b[0m"));
}
