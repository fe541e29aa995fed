/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Two-mode lexer for template source.
//!
//! Outside of tags the lexer produces one [`TokenKind::Raw`] token per run of
//! literal text. Each delimiter toggles *tagged mode*, in which whitespace is
//! insignificant and the source is split into identifiers, integers and
//! punctuation.
//!
//! Raw tokens are never empty: two adjacent delimiters yield two consecutive
//! [`TokenKind::Tag`] tokens with nothing between them.

use crate::options::DEFAULT_DELIMITER;
use crate::token::{Token, TokenKind};

/// Scans template source into [`Token`]s on demand.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
    delimiter: char,
    /// True between an opening and a closing delimiter.
    tagged: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer using the default `%` delimiter.
    pub fn new(input: &'a str) -> Self {
        Self::with_delimiter(input, DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(input: &'a str, delimiter: char) -> Self {
        Self {
            input,
            pos: 0,
            delimiter,
            tagged: false,
        }
    }

    /// Return the next token. Once the input is exhausted every call
    /// returns an [`TokenKind::Eof`] token.
    pub fn next_token(&mut self) -> Token {
        if self.tagged {
            self.skip_whitespace();
        }

        let Some(ch) = self.peek() else {
            return Token::eof(self.input.len());
        };

        if ch == self.delimiter {
            self.tagged = !self.tagged;
            return self.single(TokenKind::Tag, ch);
        }

        if self.tagged {
            self.lex_tagged(ch)
        } else {
            self.lex_raw()
        }
    }

    fn lex_tagged(&mut self, ch: char) -> Token {
        match ch {
            ':' => self.single(TokenKind::Colon, ch),
            '(' => self.single(TokenKind::LParen, ch),
            ')' => self.single(TokenKind::RParen, ch),
            ',' => self.single(TokenKind::Comma, ch),
            c if is_ident_char(c) => self.read_while(TokenKind::Ident, is_ident_char),
            c if c.is_ascii_digit() => self.read_while(TokenKind::Int, |c| c.is_ascii_digit()),
            _ => self.single(TokenKind::Illegal, ch),
        }
    }

    /// Everything up to the next delimiter or the end of input.
    fn lex_raw(&mut self) -> Token {
        let delimiter = self.delimiter;
        self.read_while(TokenKind::Raw, |c| c != delimiter)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn single(&mut self, kind: TokenKind, ch: char) -> Token {
        let start = self.pos;
        self.pos += ch.len_utf8();
        Token::new(kind, &self.input[start..self.pos], start, self.pos)
    }

    fn read_while(&mut self, kind: TokenKind, accept: impl Fn(char) -> bool) -> Token {
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest.find(|c: char| !accept(c)).unwrap_or(rest.len());
        self.pos += len;
        Token::new(kind, &self.input[start..self.pos], start, self.pos)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start_matches([' ', '\t', '\n', '\r']);
        self.pos += rest.len() - trimmed.len();
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to, but not including, end of input.
    fn next(&mut self) -> Option<Token> {
        let tok = self.next_token();
        (!tok.is(TokenKind::Eof)).then_some(tok)
    }
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
