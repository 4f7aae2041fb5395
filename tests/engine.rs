//! Library-level end-to-end tests: parse a whole program, run it through
//! `Engine::run` with in-memory I/O adapters, assert on captured stdout.
//! This is a tree-walking interpreter with no separate compiled artifact,
//! so there's nothing to spawn here (`tests/cli.rs` covers the real
//! stdin/stdout binary instead).

use grin::io::{VecSink, VecSource};
use grin::{parse_program, Engine, Outcome, DEFAULT_RECURSION_LIMIT};

fn run(src: &[&str], input: &[&str]) -> (Outcome, String) {
    let lines: Vec<String> = src.iter().map(|s| s.to_string()).collect();
    let program = parse_program(&lines).expect("program should parse");
    let mut engine = Engine::new(DEFAULT_RECURSION_LIMIT);
    let mut source = VecSource::new(input.iter().map(|s| s.to_string()));
    let mut sink = VecSink::new();
    let outcome = engine.run(&program, &mut source, &mut sink);
    (outcome, sink.output())
}

#[test]
fn counts_down_with_goto_and_arithmetic() {
    let (outcome, out) = run(
        &[
            "LET N 3",
            "TOP: PRINT N",
            "SUB N 1",
            "GOTO TOP IF N >= 0",
            "END",
        ],
        &[],
    );
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(out, "3\n2\n1\n0\n");
}

#[test]
fn gosub_chain_three_deep_returns_in_order() {
    let (outcome, out) = run(
        &[
            "GOSUB \"A\"",
            "PRINT \"done\"",
            "END",
            "A: PRINT \"a\"",
            "GOSUB \"B\"",
            "PRINT \"a-after\"",
            "RETURN",
            "B: PRINT \"b\"",
            "RETURN",
        ],
        &[],
    );
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(out, "a\nb\na-after\ndone\n");
}

#[test]
fn parse_error_on_malformed_line() {
    let lines = vec!["LET A".to_string()];
    let err = parse_program(&lines).unwrap_err();
    assert_eq!(err.line, 1);
}

#[test]
fn unset_innum_value_poisons_later_arithmetic() {
    let (outcome, out) = run(&["INNUM A", "ADD A 1", "PRINT A"], &["not-a-number"]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(out, "ERROR AT LINE 2: FAILED TO COMPUTE DUE TO INCOMPATIBLE TYPES\n");
}

#[test]
fn out_of_bounds_goto_halts_with_reported_line() {
    let (outcome, out) = run(&["PRINT 1", "GOTO 100"], &[]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(out, "1\nERROR AT LINE 2: TARGET LINE IS OUT OF BOUNDS\n");
}

#[test]
fn jump_just_past_end_is_normal_termination() {
    // GOTO whose target is exactly |program| + 1 is a normal end, not an
    // out-of-bounds error.
    let (outcome, out) = run(&["GOTO 2", "PRINT 1"], &[]);
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(out, "");
}

#[test]
fn duplicate_label_definition_uses_last_one() {
    let (outcome, out) = run(
        &[
            "GOTO \"L\"",
            "L: PRINT \"first\"",
            "END",
            "L: PRINT \"second\"",
            "END",
        ],
        &[],
    );
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(out, "second\n");
}
