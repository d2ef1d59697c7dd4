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
//! Runtime-configurable capacity and policy choices, gathered into one
//! struct instead of compile-time constants.

use crate::preprocessor::MacroConfig;

#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    pub macros: MacroConfig,
    /// Maximum number of code cells (default 1200).
    pub code_image_capacity: usize,
    /// Maximum content characters per source line before it's rejected
    /// with a Lexical error.
    pub max_line_length: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        AssemblyConfig {
            macros: MacroConfig::default(),
            code_image_capacity: 1200,
            max_line_length: 80,
        }
    }
}
