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
use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Abstracts over where source text comes from so the core pipeline
/// never touches `std::fs` directly.
pub trait SourceReader {
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// The artifact-sink counterpart: where `.am`/`.ob`/`.ent`/`.ext` land.
pub trait ArtifactSink {
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

// production file reader/writer
pub struct FsIo;

impl SourceReader for FsIo {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path)?)
    }
}

impl ArtifactSink for FsIo {
    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        Ok(fs::write(path, contents)?)
    }
}

// in-memory double for tests
#[derive(Default)]
pub struct MockFileReader {
    files: HashMap<PathBuf, String>,
    pub written: std::cell::RefCell<HashMap<PathBuf, String>>,
}

impl MockFileReader {
    pub fn add_file(&mut self, path: &str, content: &str) {
        self.files.insert(PathBuf::from(path), content.to_string());
    }

    pub fn written_file(&self, path: &str) -> Option<String> {
        self.written.borrow().get(&PathBuf::from(path)).cloned()
    }
}

impl SourceReader for MockFileReader {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Mock file not found: {}", path.display()))
    }
}

impl ArtifactSink for MockFileReader {
    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.written
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
