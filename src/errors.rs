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
use thiserror::Error;

/// The full error taxonomy surfaced by any pipeline stage. Every variant
/// carries the file and line it was raised on so the CLI can format the
/// fixed `Error in <file> line <n>: <message>` shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssemblyError {
    #[error("Error in {file} line {line}: {message}")]
    Lexical {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Error in {file} line {line}: {message}")]
    Structural {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Error in {file} line {line}: {message}")]
    Directive {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Error in {file} line {line}: {message}")]
    Capacity {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{0}")]
    Io(String),
}

impl AssemblyError {
    pub fn lexical(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        AssemblyError::Lexical {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn structural(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        AssemblyError::Structural {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn directive(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        AssemblyError::Directive {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn capacity(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        AssemblyError::Capacity {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}
