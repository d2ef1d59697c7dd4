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
//! Object-image serialization. Produces the `.ob`/`.ent`/`.ext` text
//! artifacts from the finished code image, data image, and symbol table.
//! Data-directive values are written as bare 24-bit values with no ARE
//! shift, deliberately asymmetric with operand data words.

use crate::assembler::symbol_table::SymbolTable;
use crate::ast::{CodeImage, SymbolKind, IC_START};

pub struct ObjectArtifacts {
    pub object: String,
    pub entries: Option<String>,
    pub externals: Option<String>,
}

fn address_line(addr: u32, value: u32) -> String {
    format!("{:07} {:06x}\n", addr, value & 0xFF_FFFF)
}

pub fn serialize(code_image: &CodeImage, data_image: &[i32], symbols: &SymbolTable) -> ObjectArtifacts {
    let code_size = code_image.len();
    let data_size = data_image.len();

    let mut object = format!("{} {}\n", code_size, data_size);

    for (addr, cell) in code_image.iter_filled() {
        object.push_str(&address_line(addr, cell.encode_to_u24()));
    }

    let data_base = IC_START + code_size as u32;
    for (offset, value) in data_image.iter().enumerate() {
        object.push_str(&address_line(data_base + offset as u32, *value as u32));
    }

    let entries: Vec<String> = symbols
        .iter()
        .filter(|e| e.kind == SymbolKind::Entry)
        .map(|e| format!("{} {:07}\n", e.name, e.address))
        .collect();

    let externals: Vec<String> = symbols
        .iter()
        .filter(|e| e.is_reference_site())
        .map(|e| format!("{} {:07}\n", e.name, e.address))
        .collect();

    ObjectArtifacts {
        object,
        entries: if entries.is_empty() { None } else { Some(entries.concat()) },
        externals: if externals.is_empty() { None } else { Some(externals.concat()) },
    }
}
