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
//! Macro preprocessor. Consumes raw source, produces expanded source;
//! empty/comment lines and non-macro lines pass through verbatim.

use crate::assembler::tables::{is_directive_keyword, is_mnemonic};
use crate::errors::AssemblyError;
use crate::lexer::{is_blank_or_comment, is_macro_name, next_token};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct MacroConfig {
    pub max_macros: usize,
    pub max_macro_body_lines: usize,
}

impl Default for MacroConfig {
    fn default() -> Self {
        MacroConfig {
            max_macros: 50,
            max_macro_body_lines: 50,
        }
    }
}

const RESERVED_WORDS: &[&str] = &["data", "string", "entry", "extern"];

fn is_reserved_macro_name(name: &str) -> bool {
    name == "mcro"
        || name == "mcroend"
        || is_mnemonic(name)
        || is_directive_keyword(&format!(".{name}"))
        || RESERVED_WORDS.contains(&name)
}

enum State {
    Normal,
    InDefinition { name: String, body: Vec<String> },
}

/// Expands all macro definitions/invocations in `source`. Returns the
/// expanded text, one line per output line (newline-joined, trailing
/// newline present iff the input had one).
pub fn expand(
    source: &str,
    file: &str,
    config: &MacroConfig,
) -> Result<String, AssemblyError> {
    let trailing_newline = source.ends_with('\n');
    let lines: Vec<&str> = source.split('\n').collect();
    // split('\n') on a string ending in '\n' yields a trailing empty
    // element; drop it so line numbering matches the source file.
    let lines: &[&str] = if trailing_newline {
        &lines[..lines.len() - 1]
    } else {
        &lines[..]
    };

    let mut macros: HashMap<String, Vec<String>> = HashMap::new();
    let mut state = State::Normal;
    let mut output: Vec<String> = Vec::new();

    for (idx, raw_line) in lines.iter().enumerate() {
        let line_number = idx + 1;

        match &mut state {
            State::InDefinition { name, body } => {
                let trimmed = raw_line.trim();
                let (first, _) = next_token(raw_line);
                if first == "mcro" {
                    return Err(AssemblyError::directive(
                        file,
                        line_number,
                        format!("nested macro definition inside '{}'", name),
                    ));
                }
                if trimmed == "mcroend" {
                    if body.len() > config.max_macro_body_lines {
                        return Err(AssemblyError::capacity(
                            file,
                            line_number,
                            format!(
                                "macro '{}' body exceeds {} lines",
                                name, config.max_macro_body_lines
                            ),
                        ));
                    }
                    macros.insert(name.clone(), std::mem::take(body));
                    state = State::Normal;
                } else {
                    body.push(raw_line.to_string());
                    if body.len() > config.max_macro_body_lines {
                        return Err(AssemblyError::capacity(
                            file,
                            line_number,
                            format!(
                                "macro body exceeds {} lines",
                                config.max_macro_body_lines
                            ),
                        ));
                    }
                }
            }
            State::Normal => {
                if is_blank_or_comment(raw_line) {
                    output.push(raw_line.to_string());
                    continue;
                }

                let (first, rest) = next_token(raw_line);

                if first == "mcro" {
                    let (macro_name, rest2) = next_token(rest);
                    if macro_name.is_empty() {
                        return Err(AssemblyError::directive(
                            file,
                            line_number,
                            "missing macro name after 'mcro'",
                        ));
                    }
                    if !rest2.trim().is_empty() {
                        return Err(AssemblyError::directive(
                            file,
                            line_number,
                            format!("extra content after macro name '{}'", macro_name),
                        ));
                    }
                    if !is_macro_name(macro_name) || is_reserved_macro_name(macro_name) {
                        return Err(AssemblyError::directive(
                            file,
                            line_number,
                            format!("invalid macro name '{}'", macro_name),
                        ));
                    }
                    if macros.contains_key(macro_name) {
                        return Err(AssemblyError::directive(
                            file,
                            line_number,
                            format!("duplicate macro name '{}'", macro_name),
                        ));
                    }
                    if macros.len() >= config.max_macros {
                        return Err(AssemblyError::capacity(
                            file,
                            line_number,
                            format!("macro table exceeds {} entries", config.max_macros),
                        ));
                    }
                    state = State::InDefinition {
                        name: macro_name.to_string(),
                        body: Vec::new(),
                    };
                    continue;
                }

                if first == "mcroend" {
                    return Err(AssemblyError::directive(
                        file,
                        line_number,
                        "'mcroend' without a matching 'mcro'",
                    ));
                }

                if let Some(body) = macros.get(first) {
                    if !rest.trim().is_empty() {
                        return Err(AssemblyError::directive(
                            file,
                            line_number,
                            format!("unexpected content after macro invocation '{}'", first),
                        ));
                    }
                    output.extend(body.iter().cloned());
                    continue;
                }

                output.push(raw_line.to_string());
            }
        }
    }

    if let State::InDefinition { name, .. } = state {
        return Err(AssemblyError::directive(
            file,
            lines.len(),
            format!("unclosed macro definition '{}'", name),
        ));
    }

    let mut result = output.join("\n");
    if trailing_newline && !output.is_empty() {
        result.push('\n');
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_default(source: &str) -> String {
        expand(source, "test.as", &MacroConfig::default()).unwrap()
    }

    #[test]
    fn no_macros_round_trips_byte_for_byte() {
        let source = "MAIN: mov r1, r2\nstop\n";
        assert_eq!(expand_default(source), source);
    }

    #[test]
    fn macro_definition_and_invocation_expand() {
        let source = "mcro M\nmov r1, r2\ninc r1\nmcroend\nM\nstop\n";
        let expanded = expand_default(source);
        assert_eq!(expanded, "mov r1, r2\ninc r1\nstop\n");
    }

    #[test]
    fn forward_reference_passes_through_unchanged() {
        let source = "M\nmcro M\nstop\nmcroend\n";
        let expanded = expand_default(source);
        assert_eq!(expanded, "M\nstop\n");
    }

    #[test]
    fn nested_macro_definition_is_rejected() {
        let source = "mcro A\nmcro B\nmcroend\nmcroend\n";
        assert!(matches!(
            expand(source, "t.as", &MacroConfig::default()),
            Err(AssemblyError::Directive { .. })
        ));
    }

    #[test]
    fn unclosed_macro_is_rejected() {
        let source = "mcro A\nstop\n";
        assert!(expand(source, "t.as", &MacroConfig::default()).is_err());
    }

    #[test]
    fn duplicate_macro_name_is_rejected() {
        let source = "mcro A\nstop\nmcroend\nmcro A\nrts\nmcroend\n";
        assert!(expand(source, "t.as", &MacroConfig::default()).is_err());
    }

    #[test]
    fn macro_body_overflow_is_rejected() {
        let mut source = String::from("mcro BIG\n");
        for _ in 0..60 {
            source.push_str("stop\n");
        }
        source.push_str("mcroend\n");
        let config = MacroConfig {
            max_macros: 50,
            max_macro_body_lines: 50,
        };
        assert!(expand(&source, "t.as", &config).is_err());
    }

    #[test]
    fn macro_invocation_with_trailing_content_is_error() {
        let source = "mcro M\nstop\nmcroend\nM extra\n";
        assert!(expand(source, "t.as", &MacroConfig::default()).is_err());
    }
}
