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
//! Machine-word model: builds the plain `InstructionWord`/`DataWord`
//! records from already-classified operands. Bit packing itself lives on
//! those records (`encode_to_u24`, in `crate::ast`); this module only
//! assembles the record's fields.

use crate::ast::{AddressMode, Are, InstructionWord};

fn register_of(mode: &AddressMode) -> u8 {
    match mode {
        AddressMode::Register(r) => *r,
        _ => 0,
    }
}

/// Builds the instruction word for zero, one, or two operands. `src`/`dest`
/// are already positioned by the caller (`prn` places its sole operand in
/// `src`; every other single-operand mnemonic places it in `dest`). ARE is
/// always Absolute on creation, including for zero-operand instructions.
pub fn build_instruction_word(
    opcode: u8,
    func: u8,
    src: Option<&AddressMode>,
    dest: Option<&AddressMode>,
) -> InstructionWord {
    let (src_mode, src_reg) = match src {
        Some(m) => (m.mode_bits() as u8, register_of(m)),
        None => (0, 0),
    };
    let (dest_mode, dest_reg) = match dest {
        Some(m) => (m.mode_bits() as u8, register_of(m)),
        None => (0, 0),
    };

    InstructionWord {
        opcode,
        src_mode,
        src_reg,
        dest_mode,
        dest_reg,
        func,
        are: Are::Absolute,
    }
}
