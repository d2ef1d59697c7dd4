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

use asm24::assemble_basename;
use asm24::config::AssemblyConfig;
use asm24::file_reader::MockFileReader;

fn run(source: &str) -> MockFileReader {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", source);
    let config = AssemblyConfig::default();
    assemble_basename(&reader, &reader, "prog", &config).unwrap();
    reader
}

#[test]
fn minimal_halt_program() {
    let reader = run("stop\n");
    let ob = reader.written_file("prog.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "1 0");
    assert_eq!(lines[1], "0000100 3c0004");
    assert!(reader.written_file("prog.ent").is_none());
    assert!(reader.written_file("prog.ext").is_none());
}

#[test]
fn data_directive_only() {
    let reader = run("A: .data 1, -2, 3\n");
    let ob = reader.written_file("prog.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "0 3");
    assert_eq!(lines[1], "0000100 000001");
    assert_eq!(lines[2], "0000101 fffffe");
    assert_eq!(lines[3], "0000102 000003");
}

#[test]
fn string_directive() {
    let reader = run("MSG: .string \"Hi\"\n");
    let ob = reader.written_file("prog.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "0 3");
    assert_eq!(lines[1], "0000100 000048");
    assert_eq!(lines[2], "0000101 000069");
    assert_eq!(lines[3], "0000102 000000");
}

#[test]
fn immediate_operand() {
    let reader = run("mov #5, r1\n");
    let ob = reader.written_file("prog.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "2 0");
    assert_eq!(lines[1], "0000100 001904");
    assert_eq!(lines[2], "0000101 00002c");
}

#[test]
fn forward_referenced_label() {
    let reader = run("MAIN: mov X, r1\nstop\nX: .data 7\n");
    let ob = reader.written_file("prog.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[0], "3 1");
    assert_eq!(lines[2], "0000101 00033a");
}

#[test]
fn external_reference() {
    let reader = run(".extern K\njmp K\nstop\n");
    assert!(reader.written_file("prog.ent").is_none());
    let ext = reader.written_file("prog.ext").unwrap();
    assert_eq!(ext, "K 0000101\n");
    let ob = reader.written_file("prog.ob").unwrap();
    let lines: Vec<&str> = ob.lines().collect();
    assert_eq!(lines[2], "0000101 000001");
}

#[test]
fn entries_and_externals_listed_in_insertion_order() {
    let reader = run("MAIN: jmp K\nstop\n.extern K\n.entry MAIN\n");
    let entries = reader.written_file("prog.ent").unwrap();
    assert_eq!(entries, "MAIN 0000100\n");
    let externals = reader.written_file("prog.ext").unwrap();
    assert_eq!(externals, "K 0000101\n");
}

#[test]
fn preprocessor_round_trip_with_no_macros() {
    let source = "MAIN: mov r1, r2\nstop\n";
    let reader = run(source);
    assert_eq!(reader.written_file("prog.am").unwrap(), source);
}

#[test]
fn macro_expansion_reflected_in_am_output() {
    let source = "mcro DOUBLE\ninc r1\ninc r1\nmcroend\nDOUBLE\nstop\n";
    let reader = run(source);
    assert_eq!(
        reader.written_file("prog.am").unwrap(),
        "inc r1\ninc r1\nstop\n"
    );
}

#[test]
fn idempotent_on_already_expanded_am_output() {
    let reader = run("MAIN: mov X, r1\nstop\nX: .data 7\n");
    let am = reader.written_file("prog.am").unwrap();
    let first_ob = reader.written_file("prog.ob").unwrap();

    let second_reader = run(&am);
    let second_ob = second_reader.written_file("prog.ob").unwrap();

    assert_eq!(first_ob, second_ob);
}

#[test]
fn duplicate_label_fails_the_whole_job() {
    let mut reader = MockFileReader::default();
    reader.add_file("bad.as", "A: .data 1\nA: .data 2\n");
    let config = AssemblyConfig::default();
    let result = assemble_basename(&reader, &reader, "bad", &config);
    assert!(result.is_err());
    assert!(reader.written_file("bad.ob").is_none());
}

#[test]
fn relative_addressing_outside_jump_group_fails() {
    let mut reader = MockFileReader::default();
    reader.add_file("bad.as", "mov &LOOP, r1\nLOOP: stop\n");
    let config = AssemblyConfig::default();
    let result = assemble_basename(&reader, &reader, "bad", &config);
    assert!(result.is_err());
}

#[test]
fn invalid_register_like_token_is_hard_error() {
    let mut reader = MockFileReader::default();
    reader.add_file("bad.as", "mov read, r1\n");
    let config = AssemblyConfig::default();
    let result = assemble_basename(&reader, &reader, "bad", &config);
    assert!(result.is_err());
}
