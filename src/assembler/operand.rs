/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/
//! Operand classifier. Side-effect-free: callers report
//! diagnostics based on the returned mode.

use crate::ast::AddressMode;
use crate::lexer::{is_integer_literal, is_label_name};

pub fn classify_operand(token: &str) -> AddressMode {
    if let Some(rest) = token.strip_prefix('#') {
        return if is_integer_literal(rest) {
            AddressMode::Immediate(rest.parse().unwrap_or(0))
        } else {
            AddressMode::NoAddressing
        };
    }

    if let Some(rest) = token.strip_prefix('&') {
        return if is_label_name(rest) {
            AddressMode::Relative(rest.to_string())
        } else {
            AddressMode::NoAddressing
        };
    }

    if token.starts_with('r') {
        if token.len() == 2 {
            if let Some(d) = token.chars().nth(1).and_then(|c| c.to_digit(10)) {
                if d <= 7 {
                    return AddressMode::Register(d as u8);
                }
            }
        }
        // Starts with 'r' but isn't exactly `r` followed by a digit 0..7:
        // a hard error, never silently reinterpreted as a label, even if
        // it would otherwise satisfy is_label_name (e.g. "read").
        return AddressMode::InvalidAddress;
    }

    if is_label_name(token) {
        return AddressMode::Direct(token.to_string());
    }

    AddressMode::NoAddressing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_immediate() {
        assert_eq!(classify_operand("#5"), AddressMode::Immediate(5));
        assert_eq!(classify_operand("#-3"), AddressMode::Immediate(-3));
    }

    #[test]
    fn classifies_immediate_with_bad_literal_as_no_addressing() {
        assert_eq!(classify_operand("#abc"), AddressMode::NoAddressing);
    }

    #[test]
    fn classifies_relative() {
        assert_eq!(
            classify_operand("&LOOP"),
            AddressMode::Relative("LOOP".to_string())
        );
    }

    #[test]
    fn classifies_register() {
        assert_eq!(classify_operand("r0"), AddressMode::Register(0));
        assert_eq!(classify_operand("r7"), AddressMode::Register(7));
    }

    #[test]
    fn classifies_out_of_range_register_as_invalid() {
        assert_eq!(classify_operand("r8"), AddressMode::InvalidAddress);
        assert_eq!(classify_operand("r99"), AddressMode::InvalidAddress);
    }

    #[test]
    fn classifies_direct_label() {
        assert_eq!(
            classify_operand("MAIN"),
            AddressMode::Direct("MAIN".to_string())
        );
    }

    #[test]
    fn any_r_prefixed_non_register_token_is_invalid_address() {
        // Any token starting with 'r' that isn't exactly a register form is
        // a hard error, even if it would otherwise be a valid label name.
        assert_eq!(classify_operand("read"), AddressMode::InvalidAddress);
        assert_eq!(classify_operand("r"), AddressMode::InvalidAddress);
    }
}
