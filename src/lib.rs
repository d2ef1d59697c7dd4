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
//! Library surface: the pipeline is a pure function of source text plus
//! configuration, with file I/O pushed out behind `SourceReader`/
//! `ArtifactSink` so the core stays testable without touching disk.

pub mod assembler;
pub mod ast;
pub mod config;
pub mod errors;
pub mod file_reader;
pub mod lexer;
pub mod preprocessor;

use anyhow::Context;
use assembler::serializer::ObjectArtifacts;
use config::AssemblyConfig;
use errors::AssemblyError;
use file_reader::{ArtifactSink, SourceReader};

/// Runs the full pipeline — macro expansion, both passes, serialization —
/// over already-loaded source text. The counterpart to
/// `assembler::assemble_expanded` that additionally performs macro
/// expansion, split out so callers needing the idempotence property
/// (re-running on the `.am` output reproduces the same artifacts) can call
/// `assembler::assemble_expanded` directly and skip this step.
pub fn assemble(source: &str, file: &str, config: &AssemblyConfig) -> Result<(String, ObjectArtifacts), AssemblyError> {
    let expanded = preprocessor::expand(source, file, &config.macros)?;
    let artifacts = assembler::assemble_expanded(&expanded, file, config)?;
    Ok((expanded, artifacts))
}

/// Runs the pipeline for one basename against a `SourceReader`/
/// `ArtifactSink` pair: reads `<basename>.as`, writes `<basename>.am`, and
/// on success writes `<basename>.ob` plus `<basename>.ent`/`<basename>.ext`
/// when the program produced entry or external-reference records.
pub fn assemble_basename<R: SourceReader, W: ArtifactSink>(
    reader: &R,
    writer: &W,
    basename: &str,
    config: &AssemblyConfig,
) -> Result<(), AssemblyError> {
    let source_path = format!("{basename}.as");
    let source = reader
        .read_to_string(std::path::Path::new(&source_path))
        .with_context(|| format!("failed to read {source_path}"))
        .map_err(|e| AssemblyError::Io(e.to_string()))?;

    let (expanded, artifacts) = assemble(&source, &source_path, config)?;

    let am_path = format!("{basename}.am");
    writer
        .write(std::path::Path::new(&am_path), &expanded)
        .with_context(|| format!("failed to write {am_path}"))
        .map_err(|e| AssemblyError::Io(e.to_string()))?;

    let ob_path = format!("{basename}.ob");
    writer
        .write(std::path::Path::new(&ob_path), &artifacts.object)
        .with_context(|| format!("failed to write {ob_path}"))
        .map_err(|e| AssemblyError::Io(e.to_string()))?;

    if let Some(entries) = &artifacts.entries {
        let ent_path = format!("{basename}.ent");
        writer
            .write(std::path::Path::new(&ent_path), entries)
            .with_context(|| format!("failed to write {ent_path}"))
            .map_err(|e| AssemblyError::Io(e.to_string()))?;
    }

    if let Some(externals) = &artifacts.externals {
        let ext_path = format!("{basename}.ext");
        writer
            .write(std::path::Path::new(&ext_path), externals)
            .with_context(|| format!("failed to write {ext_path}"))
            .map_err(|e| AssemblyError::Io(e.to_string()))?;
    }

    Ok(())
}
