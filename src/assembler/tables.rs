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
//! Static mnemonic and directive tables.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub opcode: u8,
    pub func: u8,
    pub operand_count: u8,
}

pub const OPCODES: &[OpcodeEntry] = &[
    OpcodeEntry { mnemonic: "mov", opcode: 0, func: 0, operand_count: 2 },
    OpcodeEntry { mnemonic: "cmp", opcode: 1, func: 0, operand_count: 2 },
    OpcodeEntry { mnemonic: "add", opcode: 2, func: 1, operand_count: 2 },
    OpcodeEntry { mnemonic: "sub", opcode: 2, func: 2, operand_count: 2 },
    OpcodeEntry { mnemonic: "lea", opcode: 4, func: 0, operand_count: 2 },
    OpcodeEntry { mnemonic: "clr", opcode: 5, func: 1, operand_count: 1 },
    OpcodeEntry { mnemonic: "not", opcode: 5, func: 2, operand_count: 1 },
    OpcodeEntry { mnemonic: "inc", opcode: 5, func: 3, operand_count: 1 },
    OpcodeEntry { mnemonic: "dec", opcode: 5, func: 4, operand_count: 1 },
    OpcodeEntry { mnemonic: "jmp", opcode: 9, func: 1, operand_count: 1 },
    OpcodeEntry { mnemonic: "bne", opcode: 9, func: 2, operand_count: 1 },
    OpcodeEntry { mnemonic: "jsr", opcode: 9, func: 3, operand_count: 1 },
    OpcodeEntry { mnemonic: "red", opcode: 12, func: 0, operand_count: 1 },
    OpcodeEntry { mnemonic: "prn", opcode: 13, func: 0, operand_count: 1 },
    OpcodeEntry { mnemonic: "rts", opcode: 14, func: 0, operand_count: 0 },
    OpcodeEntry { mnemonic: "stop", opcode: 15, func: 0, operand_count: 0 },
];

/// The jump group (opcode 9) is the only group where a Relative operand
/// is legal.
pub const JUMP_GROUP_OPCODE: u8 = 9;

pub fn lookup_mnemonic(mnemonic: &str) -> Option<&'static OpcodeEntry> {
    OPCODES.iter().find(|e| e.mnemonic == mnemonic)
}

pub fn is_mnemonic(s: &str) -> bool {
    lookup_mnemonic(s).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirKind {
    Data,
    String,
    Entry,
    Extern,
}

pub fn lookup_directive(token: &str) -> Option<DirKind> {
    match token {
        ".data" => Some(DirKind::Data),
        ".string" => Some(DirKind::String),
        ".entry" => Some(DirKind::Entry),
        ".extern" => Some(DirKind::Extern),
        _ => None,
    }
}

pub fn is_directive_keyword(s: &str) -> bool {
    matches!(s, ".data" | ".string" | ".entry" | ".extern")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_mnemonic_finds_known_opcodes() {
        let entry = lookup_mnemonic("sub").unwrap();
        assert_eq!(entry.opcode, 2);
        assert_eq!(entry.func, 2);
        assert_eq!(entry.operand_count, 2);
    }

    #[test]
    fn lookup_mnemonic_rejects_unknown() {
        assert!(lookup_mnemonic("xyz").is_none());
    }

    #[test]
    fn lookup_directive_recognizes_all_four() {
        assert_eq!(lookup_directive(".data"), Some(DirKind::Data));
        assert_eq!(lookup_directive(".string"), Some(DirKind::String));
        assert_eq!(lookup_directive(".entry"), Some(DirKind::Entry));
        assert_eq!(lookup_directive(".extern"), Some(DirKind::Extern));
        assert_eq!(lookup_directive(".bogus"), None);
    }
}
