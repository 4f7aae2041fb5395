mod cli;

use std::io::{self, BufRead};

use clap::Parser;

use grin::error::format_error;
use grin::io::{LineSink, StdinSource, StdoutSink};
use grin::{parse_program, Engine, Outcome, RuntimeError};

/// Reads stdin lines until one whose trimmed content is a lone `.`
/// (consumed but not added to the program).
fn read_program_lines() -> Vec<String> {
    let stdin = io::stdin();
    let mut lines = Vec::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim() == "." {
            break;
        }
        lines.push(line);
    }

    lines
}

fn main() {
    let cli = cli::Cli::parse();
    simple_logger::SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
        .expect("failed to initialize logger");

    let lines = read_program_lines();
    let mut stdout = StdoutSink::new();

    let program = match parse_program(&lines) {
        Ok(program) => program,
        Err(e) => {
            log::error!("parse error at line {}: {}", e.line, e.message);
            stdout.write_line(&format_error(e.line, RuntimeError::ParseError));
            std::process::exit(1);
        }
    };

    let mut engine = Engine::new(cli.recursion_limit);
    let mut stdin_source = StdinSource::new();
    let outcome = engine.run(&program, &mut stdin_source, &mut stdout);

    if outcome == Outcome::Halted {
        std::process::exit(1);
    }
}
