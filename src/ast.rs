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
//! Shared data-model types used across the pipeline. Instruction words are
//! plain records plus an explicit `encode_to_u24` function rather than
//! bit-field-packed structs: field layout is never relied upon.

use std::path::PathBuf;

/// A line of (macro-)expanded source, with its 1-based line number and
/// originating file. Immutable within a pass.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub file: PathBuf,
    pub line_number: usize,
    pub text: String,
}

impl SourceLine {
    pub fn file_display(&self) -> String {
        self.file.display().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Code,
    Data,
    Entry,
    Extern,
}

/// Three-bit relocation tag. Exactly one bit is set per resolved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Are {
    Absolute,
    Relocatable,
    External,
}

impl Are {
    pub const fn bits(self) -> u32 {
        match self {
            Are::Absolute => 0b100,
            Are::Relocatable => 0b010,
            Are::External => 0b001,
        }
    }
}

/// The result of classifying a textual operand. `NoAddressing` and
/// `InvalidAddress` are error states rather than addressing modes, but are
/// represented here since the classifier is a pure, side-effect-free
/// function over these five outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressMode {
    Immediate(i32),
    Direct(String),
    Relative(String),
    Register(u8),
    NoAddressing,
    InvalidAddress,
}

impl AddressMode {
    /// The 2-bit mode field used in the instruction word for this operand,
    /// if the operand ultimately occupies an addressing-mode position.
    pub fn mode_bits(&self) -> u32 {
        match self {
            AddressMode::Immediate(_) => 0,
            AddressMode::Direct(_) => 1,
            AddressMode::Relative(_) => 2,
            AddressMode::Register(_) => 3,
            AddressMode::NoAddressing | AddressMode::InvalidAddress => {
                unreachable!("error addressing modes never reach encoding")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionWord {
    pub opcode: u8,
    pub src_mode: u8,
    pub src_reg: u8,
    pub dest_mode: u8,
    pub dest_reg: u8,
    pub func: u8,
    pub are: Are,
}

impl InstructionWord {
    pub fn encode_to_u24(&self) -> u32 {
        ((self.opcode as u32 & 0x3F) << 18)
            | ((self.src_mode as u32 & 0x3) << 16)
            | ((self.src_reg as u32 & 0x7) << 13)
            | ((self.dest_mode as u32 & 0x3) << 11)
            | ((self.dest_reg as u32 & 0x7) << 8)
            | ((self.func as u32 & 0x1F) << 3)
            | (self.are.bits() & 0x7)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataWord {
    pub value: i32,
    pub are: Are,
}

impl DataWord {
    pub fn encode_to_u24(&self) -> u32 {
        let value_bits = (self.value as u32) & 0x1F_FFFF;
        (value_bits << 3) | (self.are.bits() & 0x7)
    }
}

/// A dense code-image cell. Empty cells (`None`) are "reserved" slots
/// awaiting a second-pass fill-in (I6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineCell {
    Instruction(InstructionWord),
    Operand(DataWord),
}

impl MachineCell {
    pub fn encode_to_u24(&self) -> u32 {
        match self {
            MachineCell::Instruction(w) => w.encode_to_u24(),
            MachineCell::Operand(w) => w.encode_to_u24(),
        }
    }
}

/// Fixed wire constant: code addressing starts at 100.
pub const IC_START: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeImageOverflow;

/// Dense, index-addressable code image bounded by a configurable capacity,
/// with a defined failure on overflow. Addresses are absolute (`IC_START`
/// and up); the backing store is indexed by `addr - IC_START`.
#[derive(Debug, Clone)]
pub struct CodeImage {
    cells: Vec<Option<MachineCell>>,
    lengths: std::collections::HashMap<u32, u8>,
    capacity: usize,
}

impl CodeImage {
    pub fn new(capacity: usize) -> Self {
        CodeImage {
            cells: Vec::new(),
            lengths: std::collections::HashMap::new(),
            capacity,
        }
    }

    fn index_of(&self, addr: u32) -> usize {
        (addr - IC_START) as usize
    }

    /// Writes `cell` at `addr`, growing the backing store as needed.
    /// Fails once `addr` would exceed the configured capacity (I5).
    pub fn set(&mut self, addr: u32, cell: MachineCell) -> Result<(), CodeImageOverflow> {
        let idx = self.index_of(addr);
        if idx >= self.capacity {
            return Err(CodeImageOverflow);
        }
        if idx >= self.cells.len() {
            self.cells.resize(idx + 1, None);
        }
        self.cells[idx] = Some(cell);
        Ok(())
    }

    /// Reserves a cell (leaves it empty) without writing a value yet,
    /// still subject to the capacity check.
    pub fn reserve(&mut self, addr: u32) -> Result<(), CodeImageOverflow> {
        let idx = self.index_of(addr);
        if idx >= self.capacity {
            return Err(CodeImageOverflow);
        }
        if idx >= self.cells.len() {
            self.cells.resize(idx + 1, None);
        }
        Ok(())
    }

    pub fn get(&self, addr: u32) -> Option<&MachineCell> {
        self.cells.get(self.index_of(addr)).and_then(|c| c.as_ref())
    }

    pub fn set_length(&mut self, addr: u32, length: u8) {
        self.lengths.insert(addr, length);
    }

    pub fn length_at(&self, addr: u32) -> Option<u8> {
        self.lengths.get(&addr).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn capacity_hint(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in address order, as (address, cell) pairs.
    pub fn iter_filled(&self) -> impl Iterator<Item = (u32, &MachineCell)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(idx, cell)| {
                cell.as_ref().map(|c| (idx as u32 + IC_START, c))
            })
    }
}
