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
//! L2 — append-ordered symbol table. Reference-site entries (appended
//! during the second pass) share a name with their declaration but are
//! distinguished by a non-zero address; this module gives that distinction
//! an explicit name (`is_reference_site`) rather than leaving it implicit.

use crate::ast::SymbolKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub address: u32,
    pub kind: SymbolKind,
    /// The kind this entry was declared with, before any `.entry`
    /// promotion. `kind` itself is overwritten to `Entry` on promotion, so
    /// this is the only way to tell a promoted code label from a promoted
    /// data label afterwards.
    declared_kind: SymbolKind,
}

impl SymbolEntry {
    /// Extern entries with a non-zero address are reference sites
    /// recorded by the second pass, not the original declaration.
    pub fn is_reference_site(&self) -> bool {
        self.kind == SymbolKind::Extern && self.address != 0
    }

    /// True for code labels, including ones later promoted to `Entry` by
    /// `.entry` — relative addressing targets must resolve through this
    /// rather than `kind == Code`, since promotion overwrites `kind`.
    pub fn is_code_address(&self) -> bool {
        self.declared_kind == SymbolKind::Code
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    DuplicateName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteError {
    Undefined,
    AlreadyExtern,
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, addr: u32, kind: SymbolKind) -> Result<(), InsertError> {
        if self.find(name).is_some() {
            return Err(InsertError::DuplicateName);
        }
        self.entries.push(SymbolEntry {
            name: name.to_string(),
            address: addr,
            kind,
            declared_kind: kind,
        });
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn find_kind(&self, name: &str, kind: SymbolKind) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.name == name && e.kind == kind)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut SymbolEntry> {
        self.entries.iter_mut().find(|e| e.name == name)
    }

    /// Appends a reference-site entry even if a declaration with the same
    /// name already exists.
    pub fn append_reference(&mut self, name: &str, addr: u32) {
        self.entries.push(SymbolEntry {
            name: name.to_string(),
            address: addr,
            kind: SymbolKind::Extern,
            declared_kind: SymbolKind::Extern,
        });
    }

    /// Promotes the first Code or Data entry with this name to Entry kind.
    /// Idempotent if already Entry; fails if undefined or only an Extern
    /// declaration exists (I2/I3).
    pub fn promote_to_entry(&mut self, name: &str) -> Result<(), PromoteError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name && matches!(e.kind, SymbolKind::Code | SymbolKind::Data | SymbolKind::Entry));

        if entry.is_none() {
            if self.find(name).is_some() {
                return Err(PromoteError::AlreadyExtern);
            }
            return Err(PromoteError::Undefined);
        }

        let entry = self.find_mut(name).unwrap();
        entry.kind = SymbolKind::Entry;
        Ok(())
    }

    /// Adds `delta` to the address of every Data-kind symbol (I4, end of
    /// first pass: rebase data offsets into absolute addresses).
    pub fn rebase_data_symbols(&mut self, delta: u32) {
        for entry in self.entries.iter_mut() {
            if entry.kind == SymbolKind::Data {
                entry.address += delta;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicate_name() {
        let mut table = SymbolTable::new();
        table.insert("A", 100, SymbolKind::Code).unwrap();
        assert_eq!(
            table.insert("A", 200, SymbolKind::Data),
            Err(InsertError::DuplicateName)
        );
    }

    #[test]
    fn promote_requires_existing_code_or_data() {
        let mut table = SymbolTable::new();
        assert_eq!(
            table.promote_to_entry("MISSING"),
            Err(PromoteError::Undefined)
        );

        table.insert("K", 0, SymbolKind::Extern).unwrap();
        assert_eq!(
            table.promote_to_entry("K"),
            Err(PromoteError::AlreadyExtern)
        );

        table.insert("A", 100, SymbolKind::Code).unwrap();
        table.promote_to_entry("A").unwrap();
        assert_eq!(table.find("A").unwrap().kind, SymbolKind::Entry);

        // idempotent
        table.promote_to_entry("A").unwrap();
    }

    #[test]
    fn append_reference_coexists_with_declaration() {
        let mut table = SymbolTable::new();
        table.insert("K", 0, SymbolKind::Extern).unwrap();
        table.append_reference("K", 101);
        table.append_reference("K", 105);

        let refs: Vec<_> = table.iter().filter(|e| e.is_reference_site()).collect();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].address, 101);
        assert_eq!(refs[1].address, 105);
    }

    #[test]
    fn rebase_only_touches_data_symbols() {
        let mut table = SymbolTable::new();
        table.insert("CODE_SYM", 100, SymbolKind::Code).unwrap();
        table.insert("DATA_SYM", 3, SymbolKind::Data).unwrap();
        table.rebase_data_symbols(103);
        assert_eq!(table.find("CODE_SYM").unwrap().address, 100);
        assert_eq!(table.find("DATA_SYM").unwrap().address, 106);
    }

    #[test]
    fn insertion_order_preserved_by_iter() {
        let mut table = SymbolTable::new();
        table.insert("B", 1, SymbolKind::Code).unwrap();
        table.insert("A", 2, SymbolKind::Data).unwrap();
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
