//! Resolves GOTO/GOSUB targets and evaluates the optional `IF` guard.

use crate::env::Environment;
use crate::error::RuntimeError;
use crate::program::Program;
use crate::token::{Literal, Token, TokenKind};
use crate::value::{CompareOp, Value};

fn compare_op(kind: TokenKind) -> CompareOp {
    match kind {
        TokenKind::LessThan => CompareOp::LessThan,
        TokenKind::LessThanOrEqual => CompareOp::LessThanOrEqual,
        TokenKind::GreaterThan => CompareOp::GreaterThan,
        TokenKind::GreaterThanOrEqual => CompareOp::GreaterThanOrEqual,
        TokenKind::Equal => CompareOp::Equal,
        TokenKind::NotEqual => CompareOp::NotEqual,
        other => unreachable!("not a relational operator: {other}"),
    }
}

/// Reads an rvalue token (identifier or literal) into a `Value`.
pub fn resolve_rvalue(env: &mut Environment, token: &Token) -> Value {
    match token.kind() {
        TokenKind::Identifier => env.get(token.ident_name()),
        TokenKind::LiteralInteger => match token.value() {
            Some(Literal::Integer(n)) => Value::Int(*n),
            _ => unreachable!("integer literal token without integer value"),
        },
        TokenKind::LiteralFloat => match token.value() {
            Some(Literal::Float(f)) => Value::Float(*f),
            _ => unreachable!("float literal token without float value"),
        },
        TokenKind::LiteralString => match token.value() {
            Some(Literal::Str(s)) => Value::Str(s.clone()),
            _ => unreachable!("string literal token without string value"),
        },
        other => unreachable!("not an rvalue: {other}"),
    }
}

/// Evaluates the guard's `lhs op rhs` given the three tokens that follow
/// `IF`.
pub fn guard_passes(
    env: &mut Environment,
    lhs: &Token,
    op: &Token,
    rhs: &Token,
) -> Result<bool, RuntimeError> {
    let left = resolve_rvalue(env, lhs);
    let right = resolve_rvalue(env, rhs);
    left.compare(compare_op(op.kind()), &right)
}

fn offset_target(current_line: usize, program_len: usize, offset: i64) -> Result<usize, RuntimeError> {
    if offset == 0 {
        return Err(RuntimeError::OutOfBounds);
    }
    let target = current_line as i64 + offset;
    if target < 1 || target > program_len as i64 + 1 {
        return Err(RuntimeError::OutOfBounds);
    }
    Ok(target as usize)
}

fn label_target(program: &Program, name: &str) -> Result<usize, RuntimeError> {
    program.label_line(name).ok_or(RuntimeError::OutOfBounds)
}

/// Resolves the jump target of a GOTO/GOSUB whose operand token is
/// `target`, relative to the source line of the jump statement itself
/// relative to the source line of the jump statement itself, not to the
/// instruction pointer after any arithmetic that line performed.
pub fn resolve_target(
    program: &Program,
    env: &mut Environment,
    target: &Token,
    current_line: usize,
) -> Result<usize, RuntimeError> {
    match target.kind() {
        TokenKind::LiteralInteger => {
            let Some(Literal::Integer(n)) = target.value() else {
                unreachable!()
            };
            offset_target(current_line, program.len(), *n)
        }
        TokenKind::LiteralString => {
            let Some(Literal::Str(name)) = target.value() else {
                unreachable!()
            };
            label_target(program, name)
        }
        TokenKind::Identifier => {
            let bound = env.get(target.ident_name());
            match bound {
                Value::Int(n) => offset_target(current_line, program.len(), n),
                Value::Str(name) => label_target(program, &name),
                Value::Float(f) => offset_target(current_line, program.len(), f as i64),
                Value::Unset => Err(RuntimeError::TypeMismatch),
            }
        }
        other => unreachable!("not a jump operand: {other}"),
    }
}
