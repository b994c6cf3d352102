use thiserror::Error;

use crate::lexer::{Position, TokenKind};

/// Represents an error that happened while reading a `.bib` source.
/// Either kind is fatal: the entry iterator stops after yielding it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character outside the grammar's alphabet was found between tokens.
    #[error("Line {line}, Col {column}. Unrecognizable character: '{character}'.")]
    UnrecognizableCharacter {
        line: usize,
        column: usize,
        character: char,
    },
    /// The parser state has no transition for the token that was read.
    /// `unexpected` is [`TokenKind::EndOfInput`] if the source ended early.
    #[error("Line {line}, Col {column}. Unexpected token: {unexpected}. Expected: {}", join(.expected))]
    UnexpectedToken {
        line: usize,
        column: usize,
        unexpected: TokenKind,
        expected: Vec<TokenKind>,
    },
}

fn join(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(TokenKind::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ParseError {
    pub(crate) fn unrecognizable(pos: Position, character: char) -> ParseError {
        ParseError::UnrecognizableCharacter {
            line: pos.line,
            column: pos.column,
            character,
        }
    }

    pub(crate) fn unexpected(pos: Position, unexpected: TokenKind, expected: Vec<TokenKind>) -> ParseError {
        ParseError::UnexpectedToken {
            line: pos.line,
            column: pos.column,
            unexpected,
            expected,
        }
    }

    /// 1-based line of the error
    pub fn line(&self) -> usize {
        self.position().line
    }

    /// 1-based column of the error
    pub fn column(&self) -> usize {
        self.position().column
    }

    pub fn position(&self) -> Position {
        match self {
            Self::UnrecognizableCharacter { line, column, .. }
            | Self::UnexpectedToken { line, column, .. } => Position {
                line: *line,
                column: *column,
            },
        }
    }
}
