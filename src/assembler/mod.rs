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
//! Assembly pipeline orchestration: wires the two passes together and
//! hands the result to the serializer.

pub mod encoder;
pub mod first_pass;
pub mod operand;
pub mod second_pass;
pub mod serializer;
pub mod symbol_table;
pub mod tables;

use crate::config::AssemblyConfig;
use crate::errors::AssemblyError;
use serializer::ObjectArtifacts;

/// Runs the first pass, second pass, and serializer over already-expanded
/// source (macro preprocessing is a separate, earlier step — see
/// `crate::preprocessor::expand` and `crate::assemble`). Exposed directly so
/// callers can re-run an already-expanded `.am` file and get back the same
/// artifacts without invoking the preprocessor a second time.
pub fn assemble_expanded(source: &str, file: &str, config: &AssemblyConfig) -> Result<ObjectArtifacts, AssemblyError> {
    let mut output = first_pass::run(source, file, config)?;

    // Data symbols are recorded as DC-relative offsets during the first
    // pass; rebasing into absolute addresses happens as its own step here,
    // not inside the pass.
    output.symbols.rebase_data_symbols(output.final_ic);

    second_pass::run(source, file, &mut output.code_image, &mut output.symbols)?;

    Ok(serializer::serialize(&output.code_image, &output.data_image, &output.symbols))
}
