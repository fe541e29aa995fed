/*
 * token.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Tokens shared between the lexer and the parser.

use std::fmt;

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Returned forever once the source is exhausted.
    Eof,
    /// A character with no meaning inside a tag.
    Illegal,
    /// A run of ASCII letters and underscores.
    Ident,
    /// A run of ASCII digits.
    Int,
    /// Literal text outside of tags.
    Raw,
    /// The tag delimiter (`%` by default).
    Tag,
    Colon,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Raw => "RAW",
            TokenKind::Tag => "TAG",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
        };
        f.write_str(name)
    }
}

/// A token: its kind, the source text it covers, and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            start,
            end,
        }
    }

    /// An end-of-input token positioned at `offset`.
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset, offset)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
