//! Hand-rolled, line-oriented scanner turning one Grin source line into a
//! `Vec<Token>`.

use std::{error::Error, fmt::Display, iter::Peekable, str::Chars};

use once_cell::sync::Lazy;
use std::collections::HashMap;
use unescape::unescape;

use crate::token::{Literal, Token, TokenKind};

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("LET", TokenKind::Let);
    m.insert("PRINT", TokenKind::Print);
    m.insert("INNUM", TokenKind::Innum);
    m.insert("INSTR", TokenKind::Instr);
    m.insert("ADD", TokenKind::Add);
    m.insert("SUB", TokenKind::Sub);
    m.insert("MULT", TokenKind::Mult);
    m.insert("DIV", TokenKind::Div);
    m.insert("GOTO", TokenKind::Goto);
    m.insert("GOSUB", TokenKind::Gosub);
    m.insert("RETURN", TokenKind::Return);
    m.insert("END", TokenKind::End);
    m.insert("IF", TokenKind::If);
    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (line {})", self.message, self.line)
    }
}

impl Error for LexError {}

pub type LexResult<T> = Result<T, LexError>;

/// Scans a single source line (no trailing newline) into its tokens.
pub struct Lexer<'a> {
    iterator: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, line: usize) -> Self {
        Self {
            iterator: input.chars().peekable(),
            line,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.iterator.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        self.iterator.next()
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            line: self.line,
        }
    }

    pub fn tokenize(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = vec![];

        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
                continue;
            }

            let token = match c {
                ':' => {
                    self.advance();
                    Token::new(TokenKind::Colon, ":", None, self.line)
                }
                '<' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::new(TokenKind::LessThanOrEqual, "<=", None, self.line)
                    } else if self.peek() == Some('>') {
                        self.advance();
                        Token::new(TokenKind::NotEqual, "<>", None, self.line)
                    } else {
                        Token::new(TokenKind::LessThan, "<", None, self.line)
                    }
                }
                '>' => {
                    self.advance();
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::new(TokenKind::GreaterThanOrEqual, ">=", None, self.line)
                    } else {
                        Token::new(TokenKind::GreaterThan, ">", None, self.line)
                    }
                }
                '=' => {
                    self.advance();
                    Token::new(TokenKind::Equal, "=", None, self.line)
                }
                '"' => self.scan_string()?,
                c if c == '-' || c.is_ascii_digit() => self.scan_number()?,
                c if c.is_alphabetic() || c == '_' => self.scan_word(),
                '.' => {
                    self.advance();
                    Token::new(TokenKind::Dot, ".", None, self.line)
                }
                other => return Err(self.error(format!("unexpected character '{other}'"))),
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn scan_string(&mut self) -> LexResult<Token> {
        self.advance(); // opening quote
        let mut raw = String::new();

        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some(escaped) => {
                        raw.push('\\');
                        raw.push(escaped);
                    }
                    None => return Err(self.error("unterminated string literal")),
                },
                Some(c) => raw.push(c),
                None => return Err(self.error("unterminated string literal")),
            }
        }

        let value = unescape(&raw)
            .ok_or_else(|| self.error(format!("invalid escape sequence in \"{raw}\"")))?;

        let text = format!("\"{raw}\"");
        Ok(Token::new(
            TokenKind::LiteralString,
            text,
            Some(Literal::Str(value)),
            self.line,
        ))
    }

    fn scan_number(&mut self) -> LexResult<Token> {
        let mut text = String::new();

        if self.peek() == Some('-') {
            text.push(self.advance().unwrap());
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.error("expected digit after '-'"));
            }
        }

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(self.advance().unwrap());
            } else {
                break;
            }
        }

        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            text.push(self.advance().unwrap());
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(self.advance().unwrap());
                } else {
                    break;
                }
            }
        }

        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid float literal '{text}'")))?;
            Ok(Token::new(
                TokenKind::LiteralFloat,
                text,
                Some(Literal::Float(value)),
                self.line,
            ))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid integer literal '{text}'")))?;
            Ok(Token::new(
                TokenKind::LiteralInteger,
                text,
                Some(Literal::Integer(value)),
                self.line,
            ))
        }
    }

    fn scan_word(&mut self) -> Token {
        let mut text = String::new();

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                text.push(self.advance().unwrap());
            } else {
                break;
            }
        }

        if let Some(kind) = KEYWORDS.get(text.as_str()) {
            Token::new(*kind, text, None, self.line)
        } else {
            Token::new(
                TokenKind::Identifier,
                text.clone(),
                Some(Literal::Ident(text)),
                self.line,
            )
        }
    }
}

/// Tokenizes every line of a whole program, 1-indexed.
pub fn tokenize_program(lines: &[String]) -> LexResult<Vec<Vec<Token>>> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| Lexer::new(line, i + 1).tokenize())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(Token::kind).collect()
    }

    #[test]
    fn lexes_let_with_integer() {
        let tokens = Lexer::new("LET A 10", 1).tokenize().unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Let, TokenKind::Identifier, TokenKind::LiteralInteger]
        );
        assert_eq!(tokens[2].value(), Some(&Literal::Integer(10)));
    }

    #[test]
    fn lexes_negative_integer() {
        let tokens = Lexer::new("GOTO -6", 1).tokenize().unwrap();
        assert_eq!(tokens[1].value(), Some(&Literal::Integer(-6)));
    }

    #[test]
    fn lexes_float_literal() {
        let tokens = Lexer::new("LET X 1.23", 1).tokenize().unwrap();
        assert_eq!(tokens[2].value(), Some(&Literal::Float(1.23)));
    }

    #[test]
    fn lexes_string_literal() {
        let tokens = Lexer::new(r#"PRINT "HELLO""#, 1).tokenize().unwrap();
        assert_eq!(tokens[1].value(), Some(&Literal::Str("HELLO".to_string())));
    }

    #[test]
    fn lexes_label_prefix() {
        let tokens = Lexer::new("APPLE: PRINT \"HI\"", 1).tokenize().unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Print,
                TokenKind::LiteralString
            ]
        );
    }

    #[test]
    fn lexes_relational_operators() {
        let tokens = Lexer::new("GOTO 2 IF A <= B", 1).tokenize().unwrap();
        assert_eq!(kinds(&tokens)[3], TokenKind::LessThanOrEqual);
        let tokens = Lexer::new("GOTO 2 IF A <> B", 1).tokenize().unwrap();
        assert_eq!(kinds(&tokens)[3], TokenKind::NotEqual);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = Lexer::new("PRINT \"oops", 1).tokenize().unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn lexes_string_with_escaped_quote_and_newline() {
        let tokens = Lexer::new(r#"PRINT "a\"b\nc""#, 1).tokenize().unwrap();
        assert_eq!(
            tokens[1].value(),
            Some(&Literal::Str("a\"b\nc".to_string()))
        );
    }

    #[test]
    fn backslash_inside_string_does_not_end_it_early() {
        let tokens = Lexer::new(r#"PRINT "line\"still going""#, 1).tokenize().unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Print, TokenKind::LiteralString]);
    }
}
