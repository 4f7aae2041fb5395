//! The parsed program: an indexed sequence of statements plus the label
//! table and label-stripping view the engine walks.

use std::collections::HashMap;

use crate::token::{Token, TokenKind};

/// One executable Grin line, tokens as lexed (label prefix, if any, still
/// attached — stripping happens on read via `effective`).
#[derive(Debug, Clone)]
pub struct Statement {
    line: usize,
    tokens: Vec<Token>,
}

impl Statement {
    pub fn new(line: usize, tokens: Vec<Token>) -> Self {
        Self { line, tokens }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The label this statement defines, if its first two tokens are
    /// `IDENTIFIER COLON`.
    pub fn label(&self) -> Option<&str> {
        if self.tokens.len() >= 2
            && self.tokens[0].kind() == TokenKind::Identifier
            && self.tokens[1].kind() == TokenKind::Colon
        {
            Some(self.tokens[0].ident_name())
        } else {
            None
        }
    }

    /// The statement body with any leading `label :` prefix stripped.
    pub fn effective(&self) -> &[Token] {
        if self.label().is_some() {
            &self.tokens[2..]
        } else {
            &self.tokens
        }
    }
}

/// A fully parsed Grin program: 1-indexed statements plus the label table.
#[derive(Debug, Clone)]
pub struct Program {
    statements: Vec<Statement>,
    labels: HashMap<String, usize>,
}

impl Program {
    /// Builds a program from parsed statements (index 0 == source line 1).
    /// Duplicate label names: last definition wins.
    pub fn new(statements: Vec<Statement>) -> Self {
        let mut labels = HashMap::new();
        for statement in &statements {
            if let Some(name) = statement.label() {
                labels.insert(name.to_string(), statement.line());
            }
        }
        Self { statements, labels }
    }

    /// Number of statements (the IP's terminal value is `len() + 1`).
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statement(&self, line: usize) -> &Statement {
        &self.statements[line - 1]
    }

    /// The statement body at a 1-based line, with any label prefix
    /// stripped.
    pub fn effective_statement(&self, line: usize) -> &[Token] {
        self.statement(line).effective()
    }

    pub fn label_line(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}
