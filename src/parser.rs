//! Recursive-descent validation of one line's tokens against the Grin
//! statement grammar, producing a `Statement`.
//!
//! ```text
//! stmt      := [label ':'] op
//! op        := 'LET' ident rvalue
//!            | 'PRINT' rvalue
//!            | 'INSTR' ident | 'INNUM' ident
//!            | ('ADD'|'SUB'|'MULT'|'DIV') ident rvalue
//!            | ('GOTO'|'GOSUB') jumpop [ 'IF' rvalue relop rvalue ]
//!            | 'RETURN' | 'END'
//! rvalue    := ident | int | float | string
//! jumpop    := ident | int | string
//! relop     := '<' | '<=' | '>' | '>=' | '=' | '<>'
//! ```
//!
//! The parser checks shape only; label resolution, type checking, and
//! guard evaluation are all runtime concerns (engine/jump resolver).

use std::{error::Error, fmt};

use crate::lexer::{tokenize_program, LexError};
use crate::program::{Program, Statement};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

impl Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        ParseError {
            message: e.message,
            line: e.line,
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

fn is_rvalue(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::LiteralInteger
            | TokenKind::LiteralFloat
            | TokenKind::LiteralString
    )
}

fn is_jumpop(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::LiteralInteger | TokenKind::LiteralString
    )
}

fn is_relop(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LessThan
            | TokenKind::LessThanOrEqual
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanOrEqual
            | TokenKind::Equal
            | TokenKind::NotEqual
    )
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Self { tokens, pos: 0, line }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, pred: impl Fn(TokenKind) -> bool, what: &str) -> ParseResult<&Token> {
        match self.peek().map(Token::kind) {
            Some(kind) if pred(kind) => Ok(self.advance().unwrap()),
            Some(kind) => Err(self.error(format!("expected {what}, found {kind}"))),
            None => Err(self.error(format!("expected {what}, found end of line"))),
        }
    }

    fn expect_kind(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        self.expect(|k| k == kind, &kind.to_string())
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: self.line,
        }
    }

    fn finish(&self) -> ParseResult<()> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing tokens"))
        }
    }
}

/// Validates the grammar of a single (already label-stripped) line.
fn parse_op(cursor: &mut Cursor) -> ParseResult<()> {
    let kind = cursor
        .peek()
        .map(Token::kind)
        .ok_or_else(|| cursor.error("expected a statement, found end of line"))?;

    match kind {
        TokenKind::Let => {
            cursor.advance();
            cursor.expect_kind(TokenKind::Identifier)?;
            cursor.expect(is_rvalue, "an rvalue")?;
        }
        TokenKind::Print => {
            cursor.advance();
            cursor.expect(is_rvalue, "an rvalue")?;
        }
        TokenKind::Instr | TokenKind::Innum => {
            cursor.advance();
            cursor.expect_kind(TokenKind::Identifier)?;
        }
        TokenKind::Add | TokenKind::Sub | TokenKind::Mult | TokenKind::Div => {
            cursor.advance();
            cursor.expect_kind(TokenKind::Identifier)?;
            cursor.expect(is_rvalue, "an rvalue")?;
        }
        TokenKind::Goto | TokenKind::Gosub => {
            cursor.advance();
            cursor.expect(is_jumpop, "a jump target")?;
            if matches!(cursor.peek().map(Token::kind), Some(TokenKind::If)) {
                cursor.advance();
                cursor.expect(is_rvalue, "an rvalue")?;
                cursor.expect(is_relop, "a relational operator")?;
                cursor.expect(is_rvalue, "an rvalue")?;
            }
        }
        TokenKind::Return | TokenKind::End => {
            cursor.advance();
        }
        other => return Err(cursor.error(format!("'{other}' cannot start a statement"))),
    }

    Ok(())
}

fn parse_line(tokens: Vec<Token>, line: usize) -> ParseResult<Statement> {
    if tokens.is_empty() {
        return Err(ParseError {
            message: "empty statement".to_string(),
            line,
        });
    }

    let mut cursor = Cursor::new(&tokens, line);

    if tokens.len() >= 2
        && tokens[0].kind() == TokenKind::Identifier
        && tokens[1].kind() == TokenKind::Colon
    {
        cursor.advance();
        cursor.advance();
    }

    parse_op(&mut cursor)?;
    cursor.finish()?;

    Ok(Statement::new(line, tokens))
}

/// Parses a whole program from its source lines (already split, 1-indexed,
/// terminator line already removed by the driver).
pub fn parse_program(lines: &[String]) -> ParseResult<Program> {
    let lines_tokens = tokenize_program(lines)?;

    let statements = lines_tokens
        .into_iter()
        .enumerate()
        .map(|(i, tokens)| parse_line(tokens, i + 1))
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(Program::new(statements))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_a_simple_program() {
        let program = parse_program(&lines(&["LET A 10", "PRINT A", "END"])).unwrap();
        assert_eq!(program.len(), 3);
    }

    #[test]
    fn parses_labeled_gosub_target() {
        let program = parse_program(&lines(&[
            "GOSUB \"APPLE\"",
            "END",
            "APPLE: PRINT \"HI\"",
            "RETURN",
        ]))
        .unwrap();
        assert_eq!(program.label_line("APPLE"), Some(3));
    }

    #[test]
    fn parses_guarded_goto() {
        let program = parse_program(&lines(&["GOTO 2 IF A > 4", "PRINT 1"])).unwrap();
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn rejects_missing_operand() {
        let err = parse_program(&lines(&["LET A"])).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_unknown_leading_token() {
        let err = parse_program(&lines(&["10 20"])).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = parse_program(&lines(&["END END"])).unwrap_err();
        assert_eq!(err.line, 1);
    }
}
