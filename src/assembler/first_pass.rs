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
//! First pass: single-line driver that updates IC/DC, builds
//! the symbol table, and emits the partial code image.

use crate::assembler::operand::classify_operand;
use crate::assembler::symbol_table::SymbolTable;
use crate::assembler::tables::{lookup_directive, lookup_mnemonic, DirKind, JUMP_GROUP_OPCODE};
use crate::assembler::encoder::build_instruction_word;
use crate::ast::{AddressMode, Are, CodeImage, DataWord, MachineCell, SymbolKind, IC_START};
use crate::config::AssemblyConfig;
use crate::errors::AssemblyError;
use crate::lexer::{is_blank_or_comment, is_integer_literal, is_label_name, next_token};

pub struct FirstPassOutput {
    pub code_image: CodeImage,
    pub data_image: Vec<i32>,
    pub symbols: SymbolTable,
    pub final_ic: u32,
    pub final_dc: u32,
}

struct State {
    ic: u32,
    dc: u32,
    symbols: SymbolTable,
    code_image: CodeImage,
    data_image: Vec<i32>,
}

pub fn run(source: &str, file: &str, config: &AssemblyConfig) -> Result<FirstPassOutput, AssemblyError> {
    let mut state = State {
        ic: IC_START,
        dc: 0,
        symbols: SymbolTable::new(),
        code_image: CodeImage::new(config.code_image_capacity),
        data_image: Vec::new(),
    };

    for (idx, line) in source.lines().enumerate() {
        let line_number = idx + 1;
        process_line(line, line_number, file, config, &mut state)?;
    }

    Ok(FirstPassOutput {
        code_image: state.code_image,
        data_image: state.data_image,
        symbols: state.symbols,
        final_ic: state.ic,
        final_dc: state.dc,
    })
}

fn process_line(
    line: &str,
    line_number: usize,
    file: &str,
    config: &AssemblyConfig,
    state: &mut State,
) -> Result<(), AssemblyError> {
    if line.len() > config.max_line_length {
        return Err(AssemblyError::lexical(
            file,
            line_number,
            format!(
                "line exceeds maximum length of {} characters",
                config.max_line_length
            ),
        ));
    }

    if is_blank_or_comment(line) {
        return Ok(());
    }

    let trimmed = line.trim_start();
    let (label, remainder) = split_label(trimmed);

    if let Some(name) = label {
        if !is_label_name(name) {
            return Err(AssemblyError::lexical(
                file,
                line_number,
                format!("invalid label name '{}'", name),
            ));
        }
        if state.symbols.find(name).is_some() {
            return Err(AssemblyError::structural(
                file,
                line_number,
                format!("duplicate label definition '{}'", name),
            ));
        }
    }

    let (op_token, operand_str) = next_token(remainder);

    if op_token.is_empty() {
        return Err(AssemblyError::structural(
            file,
            line_number,
            "label is not followed by an instruction or directive",
        ));
    }

    if op_token.starts_with('.') {
        let dir_kind = lookup_directive(op_token).ok_or_else(|| {
            AssemblyError::directive(
                file,
                line_number,
                format!("unknown directive '{}'", op_token),
            )
        })?;
        return process_directive(dir_kind, label, operand_str, line_number, file, state);
    }

    process_instruction(op_token, label, operand_str, line_number, file, state)
}

/// Splits a leading `LABEL:` prefix off a trimmed line, if present. Shared
/// by both passes since the second pass must skip over the same prefix
/// without re-registering it.
pub(crate) fn split_label(trimmed: &str) -> (Option<&str>, &str) {
    let (first_tok, rest) = next_token(trimmed);
    match first_tok.strip_suffix(':') {
        Some(name) if !name.is_empty() && !name.contains(':') => (Some(name), rest),
        _ => (None, trimmed),
    }
}

fn process_directive(
    kind: DirKind,
    label: Option<&str>,
    operand_str: &str,
    line_number: usize,
    file: &str,
    state: &mut State,
) -> Result<(), AssemblyError> {
    match kind {
        DirKind::Data => {
            let values = parse_integer_list(operand_str, file, line_number)?;
            if values.is_empty() {
                return Err(AssemblyError::directive(
                    file,
                    line_number,
                    "'.data' requires at least one value",
                ));
            }
            if let Some(name) = label {
                insert_or_duplicate(state, name, state.dc, SymbolKind::Data, file, line_number)?;
            }
            for v in values {
                state.data_image.push(v);
                state.dc += 1;
            }
            Ok(())
        }
        DirKind::String => {
            let text = parse_quoted_string(operand_str, file, line_number)?;
            if let Some(name) = label {
                insert_or_duplicate(state, name, state.dc, SymbolKind::Data, file, line_number)?;
            }
            for c in text.chars() {
                state.data_image.push(c as i32);
                state.dc += 1;
            }
            state.data_image.push(0);
            state.dc += 1;
            Ok(())
        }
        DirKind::Extern => {
            let (name, trailing) = next_token(operand_str);
            if name.is_empty() {
                return Err(AssemblyError::directive(
                    file,
                    line_number,
                    "'.extern' requires a label operand",
                ));
            }
            if !trailing.is_empty() {
                return Err(AssemblyError::directive(
                    file,
                    line_number,
                    format!("unexpected content after '.extern {}'", name),
                ));
            }
            if !is_label_name(name) {
                return Err(AssemblyError::lexical(
                    file,
                    line_number,
                    format!("invalid label name '{}'", name),
                ));
            }
            state.symbols.insert(name, 0, SymbolKind::Extern).map_err(|_| {
                AssemblyError::structural(
                    file,
                    line_number,
                    format!("duplicate label definition '{}'", name),
                )
            })
        }
        DirKind::Entry => {
            if label.is_some() {
                return Err(AssemblyError::structural(
                    file,
                    line_number,
                    "'.entry' directive cannot have a label prefix",
                ));
            }
            let (name, trailing) = next_token(operand_str);
            if name.is_empty() {
                return Err(AssemblyError::directive(
                    file,
                    line_number,
                    "'.entry' requires a label operand",
                ));
            }
            if !trailing.is_empty() {
                return Err(AssemblyError::directive(
                    file,
                    line_number,
                    format!("unexpected content after '.entry {}'", name),
                ));
            }
            if !is_label_name(name) {
                return Err(AssemblyError::lexical(
                    file,
                    line_number,
                    format!("invalid label name '{}'", name),
                ));
            }
            Ok(())
        }
    }
}

fn insert_or_duplicate(
    state: &mut State,
    name: &str,
    addr: u32,
    kind: SymbolKind,
    file: &str,
    line_number: usize,
) -> Result<(), AssemblyError> {
    state.symbols.insert(name, addr, kind).map_err(|_| {
        AssemblyError::structural(
            file,
            line_number,
            format!("duplicate label definition '{}'", name),
        )
    })
}

fn process_instruction(
    mnemonic: &str,
    label: Option<&str>,
    operand_str: &str,
    line_number: usize,
    file: &str,
    state: &mut State,
) -> Result<(), AssemblyError> {
    let entry = lookup_mnemonic(mnemonic).ok_or_else(|| {
        AssemblyError::structural(
            file,
            line_number,
            format!("unknown mnemonic '{}'", mnemonic),
        )
    })?;

    if let Some(name) = label {
        insert_or_duplicate(state, name, state.ic, SymbolKind::Code, file, line_number)?;
    }

    let operand_tokens = parse_operand_list(operand_str, file, line_number, mnemonic)?;
    if operand_tokens.len() != entry.operand_count as usize {
        return Err(AssemblyError::structural(
            file,
            line_number,
            format!(
                "mnemonic '{}' expects {} operand(s), got {}",
                mnemonic,
                entry.operand_count,
                operand_tokens.len()
            ),
        ));
    }

    let modes: Vec<AddressMode> = operand_tokens
        .iter()
        .map(|t| classify_operand(t))
        .collect();

    for (tok, mode) in operand_tokens.iter().zip(modes.iter()) {
        if *mode == AddressMode::InvalidAddress {
            return Err(AssemblyError::lexical(
                file,
                line_number,
                format!("invalid register operand '{}'", tok),
            ));
        }
        if *mode == AddressMode::NoAddressing {
            return Err(AssemblyError::structural(
                file,
                line_number,
                format!("operand '{}' is not a valid addressing mode", tok),
            ));
        }
        if matches!(mode, AddressMode::Relative(_)) && entry.opcode != JUMP_GROUP_OPCODE {
            return Err(AssemblyError::structural(
                file,
                line_number,
                "relative addressing is only legal for jump-group instructions",
            ));
        }
    }

    let (src, dest): (Option<&AddressMode>, Option<&AddressMode>) = match modes.len() {
        0 => (None, None),
        1 => {
            if mnemonic == "prn" {
                (Some(&modes[0]), None)
            } else {
                (None, Some(&modes[0]))
            }
        }
        2 => (Some(&modes[0]), Some(&modes[1])),
        _ => unreachable!("arity already validated"),
    };

    let ic_at_start = state.ic;
    let word = build_instruction_word(entry.opcode, entry.func, src, dest);
    state
        .code_image
        .set(state.ic, MachineCell::Instruction(word))
        .map_err(|_| code_overflow(file, line_number, state.code_image.capacity_hint()))?;
    state.code_image.set_length(ic_at_start, 1);
    state.ic += 1;

    for mode in &modes {
        match mode {
            AddressMode::Register(_) => {}
            AddressMode::Immediate(value) => {
                state
                    .code_image
                    .set(
                        state.ic,
                        MachineCell::Operand(DataWord {
                            value: *value,
                            are: Are::Absolute,
                        }),
                    )
                    .map_err(|_| code_overflow(file, line_number, state.code_image.capacity_hint()))?;
                state.ic += 1;
            }
            AddressMode::Direct(_) | AddressMode::Relative(_) => {
                state
                    .code_image
                    .reserve(state.ic)
                    .map_err(|_| code_overflow(file, line_number, state.code_image.capacity_hint()))?;
                state.ic += 1;
            }
            AddressMode::NoAddressing | AddressMode::InvalidAddress => unreachable!(),
        }
    }

    state
        .code_image
        .set_length(ic_at_start, (state.ic - ic_at_start) as u8);

    Ok(())
}

fn code_overflow(file: &str, line_number: usize, capacity: usize) -> AssemblyError {
    AssemblyError::capacity(
        file,
        line_number,
        format!("code image exceeds capacity of {} cells", capacity),
    )
}

/// Shared comma-list splitter for `.data` values and instruction operand
/// lists: rejects leading/trailing/consecutive commas by surfacing an
/// empty slot between separators.
fn split_comma_list(s: &str) -> Result<Vec<&str>, ()> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for part in trimmed.split(',') {
        let t = part.trim();
        if t.is_empty() {
            return Err(());
        }
        out.push(t);
    }
    Ok(out)
}

fn parse_integer_list(s: &str, file: &str, line_number: usize) -> Result<Vec<i32>, AssemblyError> {
    let tokens = split_comma_list(s).map_err(|_| {
        AssemblyError::directive(
            file,
            line_number,
            "'.data' has a leading, trailing, or consecutive comma",
        )
    })?;
    tokens
        .into_iter()
        .map(|t| {
            if is_integer_literal(t) {
                Ok(t.parse::<i32>().unwrap_or(0))
            } else {
                Err(AssemblyError::directive(
                    file,
                    line_number,
                    format!("invalid '.data' value '{}'", t),
                ))
            }
        })
        .collect()
}

pub(crate) fn parse_operand_list<'a>(
    s: &'a str,
    file: &str,
    line_number: usize,
    mnemonic: &str,
) -> Result<Vec<&'a str>, AssemblyError> {
    split_comma_list(s).map_err(|_| {
        AssemblyError::structural(
            file,
            line_number,
            format!("malformed operand list for '{}'", mnemonic),
        )
    })
}

fn parse_quoted_string(s: &str, file: &str, line_number: usize) -> Result<String, AssemblyError> {
    let trimmed = s.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('"') || !trimmed.ends_with('"') {
        return Err(AssemblyError::lexical(
            file,
            line_number,
            "unterminated string in '.string' directive",
        ));
    }
    Ok(trimmed[1..trimmed.len() - 1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_default(source: &str) -> FirstPassOutput {
        run(source, "t.as", &AssemblyConfig::default()).unwrap()
    }

    #[test]
    fn stop_only_program() {
        let out = run_default("stop\n");
        assert_eq!(out.final_ic, 101);
        assert_eq!(out.final_dc, 0);
        let cell = out.code_image.get(100).unwrap();
        assert_eq!(cell.encode_to_u24(), 0x3C0004);
    }

    #[test]
    fn data_directive_only() {
        let out = run_default("A: .data 1, -2, 3\n");
        assert_eq!(out.final_ic, 100);
        assert_eq!(out.final_dc, 3);
        assert_eq!(out.data_image, vec![1, -2, 3]);
        assert_eq!(out.symbols.find("A").unwrap().address, 0);
    }

    #[test]
    fn string_directive() {
        let out = run_default("MSG: .string \"Hi\"\n");
        assert_eq!(out.data_image, vec!['H' as i32, 'i' as i32, 0]);
        assert_eq!(out.final_dc, 3);
    }

    #[test]
    fn immediate_operand_instruction() {
        let out = run_default("mov #5, r1\n");
        assert_eq!(out.final_ic, 102);
        let word = out.code_image.get(100).unwrap();
        assert_eq!(word.encode_to_u24(), 0x001904);
        let extra = out.code_image.get(101).unwrap();
        assert_eq!(extra.encode_to_u24(), (5 << 3) | 4);
    }

    #[test]
    fn forward_reference_reserves_cell() {
        let out = run_default("MAIN: mov X, r1\nstop\nX: .data 7\n");
        assert_eq!(out.final_ic, 103);
        assert_eq!(out.final_dc, 1);
        assert!(out.code_image.get(101).is_none());
        assert_eq!(out.code_image.length_at(100), Some(2));
    }

    #[test]
    fn duplicate_label_is_error() {
        let result = run("A: .data 1\nA: .data 2\n", "t.as", &AssemblyConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn relative_addressing_outside_jump_is_error() {
        let result = run("mov &X, r1\n", "t.as", &AssemblyConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn extern_directive_registers_symbol() {
        let out = run_default(".extern K\njmp K\nstop\n");
        assert_eq!(out.symbols.find("K").unwrap().address, 0);
    }

    #[test]
    fn entry_with_label_prefix_is_error() {
        let result = run("X: .entry Y\n", "t.as", &AssemblyConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn empty_data_list_is_error() {
        let result = run("A: .data\n", "t.as", &AssemblyConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn consecutive_comma_in_data_is_error() {
        let result = run("A: .data 1,,2\n", "t.as", &AssemblyConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn wrong_arity_is_error() {
        let result = run("mov r1\n", "t.as", &AssemblyConfig::default());
        assert!(result.is_err());
    }
}
