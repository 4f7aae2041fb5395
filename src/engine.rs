//! The statement dispatcher: walks the instruction pointer over a
//! `Program`, mutating `Environment` and `CallStack`, writing through the
//! injected I/O adapters.

use log::{debug, error, trace};

use crate::callstack::CallStack;
use crate::env::Environment;
use crate::error::{format_error, RuntimeError};
use crate::io::{LineSink, LineSource};
use crate::jump::{guard_passes, resolve_rvalue, resolve_target};
use crate::program::Program;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Default GOSUB nesting cap (see DESIGN.md, Open Question resolutions).
pub const DEFAULT_RECURSION_LIMIT: usize = 4096;

/// How a program run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Ran to completion (IP past end, `END`, or a top-level `RETURN`).
    Completed,
    /// Halted on a runtime error; the error line has already been written.
    Halted,
}

enum Step {
    Advance(usize),
    Halt,
}

pub struct Engine {
    env: Environment,
    call_stack: CallStack,
}

impl Engine {
    pub fn new(recursion_limit: usize) -> Self {
        Self {
            env: Environment::new(),
            call_stack: CallStack::new(recursion_limit),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Runs `program` to completion or halt, reading via `source` and
    /// writing via `sink` (both PRINT output and any halting error line).
    pub fn run(
        &mut self,
        program: &Program,
        source: &mut dyn LineSource,
        sink: &mut dyn LineSink,
    ) -> Outcome {
        let mut ip: usize = 1;

        while ip <= program.len() {
            let stmt = program.effective_statement(ip);
            trace!("line {ip}: {:?}", stmt.first().map(Token::kind));

            match self.step(program, stmt, ip, source, sink) {
                Ok(Step::Advance(next)) => ip = next,
                Ok(Step::Halt) => return Outcome::Completed,
                Err(e) => {
                    error!("halting at line {ip}: {e}");
                    sink.write_line(&format_error(ip, e));
                    return Outcome::Halted;
                }
            }
        }

        Outcome::Completed
    }

    fn step(
        &mut self,
        program: &Program,
        stmt: &[Token],
        ip: usize,
        source: &mut dyn LineSource,
        sink: &mut dyn LineSink,
    ) -> Result<Step, RuntimeError> {
        let Some(first) = stmt.first() else {
            // The parser guarantees every labeled statement carries a
            // non-empty body; an empty effective statement cannot occur
            // for a well-formed program.
            return Ok(Step::Advance(ip + 1));
        };

        match first.kind() {
            TokenKind::End => Ok(Step::Halt),
            TokenKind::Return => match self.call_stack.pop() {
                Some(target) => Ok(Step::Advance(target)),
                None => Ok(Step::Halt),
            },
            TokenKind::Let => {
                let name = stmt[1].ident_name().to_string();
                let value = resolve_rvalue(&mut self.env, &stmt[2]);
                self.env.set(&name, value);
                Ok(Step::Advance(ip + 1))
            }
            TokenKind::Print => {
                let value = resolve_rvalue(&mut self.env, &stmt[1]);
                sink.write_line(&value.to_string());
                Ok(Step::Advance(ip + 1))
            }
            TokenKind::Add | TokenKind::Sub | TokenKind::Mult | TokenKind::Div => {
                let name = stmt[1].ident_name().to_string();
                let lhs = self.env.get(&name); // default-on-read
                let rhs = resolve_rvalue(&mut self.env, &stmt[2]);
                let result = match first.kind() {
                    TokenKind::Add => lhs.add(&rhs),
                    TokenKind::Sub => lhs.sub(&rhs),
                    TokenKind::Mult => lhs.mul(&rhs),
                    TokenKind::Div => lhs.div(&rhs),
                    _ => unreachable!(),
                }?;
                self.env.set(&name, result);
                Ok(Step::Advance(ip + 1))
            }
            TokenKind::Instr => {
                let name = stmt[1].ident_name().to_string();
                let line = source.read_line().unwrap_or_default();
                self.env.set(&name, Value::Str(line));
                Ok(Step::Advance(ip + 1))
            }
            TokenKind::Innum => {
                let name = stmt[1].ident_name().to_string();
                let line = source.read_line().unwrap_or_default();
                self.env.set(&name, parse_num(&line));
                Ok(Step::Advance(ip + 1))
            }
            TokenKind::Goto => {
                if self.evaluate_guard(stmt)? {
                    let next = resolve_target(program, &mut self.env, &stmt[1], ip)?;
                    debug!("GOTO line {ip} -> {next}");
                    Ok(Step::Advance(next))
                } else {
                    Ok(Step::Advance(ip + 1))
                }
            }
            TokenKind::Gosub => {
                if self.evaluate_guard(stmt)? {
                    let next = resolve_target(program, &mut self.env, &stmt[1], ip)?;
                    debug!("GOSUB line {ip} -> {next}, return to {}", ip + 1);
                    self.call_stack.push(ip + 1)?;
                    Ok(Step::Advance(next))
                } else {
                    Ok(Step::Advance(ip + 1))
                }
            }
            other => unreachable!("not a statement-leading token: {other}"),
        }
    }

    /// Evaluates the optional `IF lhs op rhs` suffix of a GOTO/GOSUB
    /// statement. No suffix means the guard trivially passes.
    fn evaluate_guard(&mut self, stmt: &[Token]) -> Result<bool, RuntimeError> {
        if stmt.len() <= 2 {
            return Ok(true);
        }
        // stmt = [GOTO|GOSUB, target, IF, lhs, op, rhs]
        guard_passes(&mut self.env, &stmt[3], &stmt[4], &stmt[5])
    }
}

/// Parses one INNUM input line: tried as an integer first, then a float,
/// falling back to `Value::Unset` if neither parses.
fn parse_num(entry: &str) -> Value {
    if let Ok(n) = entry.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(f) = entry.parse::<f64>() {
        Value::Float(f)
    } else {
        Value::Unset
    }
}
