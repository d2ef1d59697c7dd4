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
//! Second pass: re-scans the expanded source, resolves
//! labels, fills reserved cells, records external reference sites, and
//! promotes `.entry` symbols.

use crate::assembler::first_pass::{parse_operand_list, split_label};
use crate::assembler::operand::classify_operand;
use crate::assembler::symbol_table::{PromoteError, SymbolTable};
use crate::assembler::tables::{lookup_directive, lookup_mnemonic, DirKind};
use crate::ast::{AddressMode, Are, CodeImage, DataWord, MachineCell, SymbolKind, IC_START};
use crate::errors::AssemblyError;
use crate::lexer::{is_blank_or_comment, next_token};

pub fn run(
    source: &str,
    file: &str,
    code_image: &mut CodeImage,
    symbols: &mut SymbolTable,
) -> Result<(), AssemblyError> {
    let mut ic = IC_START;

    for (idx, line) in source.lines().enumerate() {
        let line_number = idx + 1;

        if is_blank_or_comment(line) {
            continue;
        }

        let trimmed = line.trim_start();
        let (label, remainder) = split_label(trimmed);
        let (op_token, operand_str) = next_token(remainder);

        if op_token.starts_with('.') {
            let dir_kind = lookup_directive(op_token).ok_or_else(|| {
                AssemblyError::directive(
                    file,
                    line_number,
                    format!("unknown directive '{}'", op_token),
                )
            })?;
            if dir_kind == DirKind::Entry {
                process_entry(operand_str, line_number, file, symbols)?;
            }
            continue;
        }

        let _ = label; // labels on instruction lines are already in the table

        let entry = lookup_mnemonic(op_token).ok_or_else(|| {
            AssemblyError::structural(
                file,
                line_number,
                format!("unknown mnemonic '{}'", op_token),
            )
        })?;

        let operand_tokens = parse_operand_list(operand_str, file, line_number, op_token)?;
        let modes: Vec<AddressMode> = operand_tokens.iter().map(|t| classify_operand(t)).collect();

        let instruction_start = ic;
        let length = code_image.length_at(instruction_start).ok_or_else(|| {
            AssemblyError::structural(
                file,
                line_number,
                format!("no instruction recorded at address {}", instruction_start),
            )
        })?;

        let mut cursor = instruction_start + 1;
        for mode in &modes {
            match mode {
                AddressMode::Register(_) => {}
                AddressMode::Immediate(_) => {
                    cursor += 1;
                }
                AddressMode::Direct(name) => {
                    let symbol = symbols.find(name).cloned().ok_or_else(|| {
                        AssemblyError::structural(
                            file,
                            line_number,
                            format!("undefined label '{}'", name),
                        )
                    })?;
                    let are = if symbol.kind == SymbolKind::Extern {
                        Are::External
                    } else {
                        Are::Relocatable
                    };
                    code_image
                        .set(
                            cursor,
                            MachineCell::Operand(DataWord {
                                value: symbol.address as i32,
                                are,
                            }),
                        )
                        .expect("cell was reserved in the first pass");
                    if symbol.kind == SymbolKind::Extern {
                        symbols.append_reference(name, cursor);
                    }
                    cursor += 1;
                }
                AddressMode::Relative(name) => {
                    let symbol = symbols
                        .find(name)
                        .filter(|s| s.is_code_address())
                        .cloned()
                        .ok_or_else(|| {
                            AssemblyError::structural(
                                file,
                                line_number,
                                format!("relative addressing target '{}' is not a code label", name),
                            )
                        })?;
                    let value = symbol.address as i32 - instruction_start as i32;
                    code_image
                        .set(
                            cursor,
                            MachineCell::Operand(DataWord {
                                value,
                                are: Are::Absolute,
                            }),
                        )
                        .expect("cell was reserved in the first pass");
                    cursor += 1;
                }
                AddressMode::NoAddressing | AddressMode::InvalidAddress => unreachable!(),
            }
        }

        ic = instruction_start + length as u32;
    }

    Ok(())
}

fn process_entry(
    operand_str: &str,
    line_number: usize,
    file: &str,
    symbols: &mut SymbolTable,
) -> Result<(), AssemblyError> {
    let (name, _) = next_token(operand_str);
    symbols.promote_to_entry(name).map_err(|e| match e {
        PromoteError::Undefined => AssemblyError::structural(
            file,
            line_number,
            format!("'.entry' target '{}' is undefined", name),
        ),
        PromoteError::AlreadyExtern => AssemblyError::structural(
            file,
            line_number,
            format!("'{}' cannot be both entry and extern", name),
        ),
    })
}
