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
//! L1 — lexical helpers. Centralized so label-name and integer-literal
//! rules are accepted/rejected consistently by every caller (macro
//! names, label definitions, operand classification).

pub const MAX_LABEL_LEN: usize = 31;

pub fn is_label_name(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_LABEL_LEN {
        return false;
    }
    let mut chars = s.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}

/// `is_label_name` augmented with underscores, used for macro names only.
pub fn is_macro_name(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_LABEL_LEN {
        return false;
    }
    let mut chars = s.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_integer_literal(s: &str) -> bool {
    let rest = s.strip_prefix(['+', '-']).unwrap_or(s);
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

/// Returns the text before a trailing `:` when the first whitespace-delimited
/// token of `line` ends in `:` (and the `:` is not embedded earlier in the
/// token). Otherwise returns the empty string.
pub fn read_label_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    let first_token = match trimmed.split_whitespace().next() {
        Some(t) => t,
        None => return "",
    };
    match first_token.strip_suffix(':') {
        Some(name) if !name.is_empty() && !name.contains(':') => name,
        _ => "",
    }
}

/// Splits leading whitespace off `line`, returning the remainder.
pub fn skip_whitespace(line: &str) -> &str {
    line.trim_start()
}

/// True if the line (after whitespace skipping) is empty or a comment.
pub fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = skip_whitespace(line);
    trimmed.is_empty() || trimmed.starts_with(';')
}

/// Splits `s` on the first run of whitespace, returning (token, rest).
/// `rest` still has its own leading whitespace trimmed.
pub fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_name_accepts_alnum_starting_with_letter() {
        assert!(is_label_name("A"));
        assert!(is_label_name("Main2"));
        assert!(!is_label_name("2Main"));
        assert!(!is_label_name(""));
    }

    #[test]
    fn label_name_rejects_over_length() {
        let long = "a".repeat(32);
        assert!(!is_label_name(&long));
        let ok = "a".repeat(31);
        assert!(is_label_name(&ok));
    }

    #[test]
    fn integer_literal_accepts_sign_and_digits() {
        assert!(is_integer_literal("123"));
        assert!(is_integer_literal("+5"));
        assert!(is_integer_literal("-2"));
        assert!(!is_integer_literal("-"));
        assert!(!is_integer_literal("1.5"));
        assert!(!is_integer_literal(""));
    }

    #[test]
    fn label_prefix_extracted_when_colon_present() {
        assert_eq!(read_label_prefix("MAIN: mov r1, r2"), "MAIN");
        assert_eq!(read_label_prefix("  X: .data 1"), "X");
    }

    #[test]
    fn label_prefix_absent_returns_empty() {
        assert_eq!(read_label_prefix("mov r1, r2"), "");
        assert_eq!(read_label_prefix(""), "");
    }

    #[test]
    fn label_prefix_rejects_embedded_colon() {
        assert_eq!(read_label_prefix("A:B: mov r1, r2"), "");
    }
}
