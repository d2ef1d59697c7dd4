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
use asm24::config::AssemblyConfig;
use asm24::file_reader::FsIo;
use asm24::{assemble_basename, errors::AssemblyError};
use clap::Parser as clap_parser;

#[derive(clap_parser)]
#[clap(version = "0.1.0", author = "Connor Nolan")]
struct Opts {
    /// One or more source basenames (without the `.as` extension); each
    /// is assembled independently and a failure in one does not stop the
    /// others.
    #[clap(required = true)]
    basenames: Vec<String>,
}

fn main() {
    let opts: Opts = Opts::parse();
    let io = FsIo;
    let config = AssemblyConfig::default();

    let mut all_succeeded = true;

    for basename in &opts.basenames {
        match assemble_basename(&io, &io, basename, &config) {
            Ok(()) => {
                println!("Successfully assembled {basename}.as");
            }
            Err(err) => {
                all_succeeded = false;
                eprintln!("{}", format_error(basename, &err));
            }
        }
    }

    if !all_succeeded {
        std::process::exit(1);
    }
}

fn format_error(basename: &str, err: &AssemblyError) -> String {
    match err {
        AssemblyError::Io(message) => format!("Error in {basename}.as: {message}"),
        other => other.to_string(),
    }
}
