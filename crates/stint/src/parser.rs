/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recursive-descent parser for template source.
//!
//! The parser reads tokens from a [`Lexer`] with one token of lookahead
//! (`cur` and `peek`) and builds a [`TemplateTree`]. It never stops at the
//! first problem: each one is recorded as a [`Diagnostic`], the parser skips
//! ahead to a tag boundary and carries on, so a single pass reports every
//! error in the template.
//!
//! ```text
//! Template       := Node*
//! Node           := RAW | Interpolation
//! Interpolation  := TAG IDENT (COLON ConstraintSpec)* TAG
//! ConstraintSpec := IDENT ArgList?
//! ArgList        := LPAREN (INT | COMMA)* RPAREN
//! ```

use std::path::Path;

use tracing::{debug, trace};

use crate::ast::{
    CONSTRAINT_INT, CONSTRAINT_LEN, Constraint, Identifier, Interpolation, Node, RawText,
    SourceSpan, TemplateTree,
};
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, TemplateResult};
use crate::lexer::Lexer;
use crate::options::CompileOptions;
use crate::token::{Token, TokenKind};

/// A compiled template ready for evaluation.
///
/// Immutable once built; evaluate it as many times as needed.
#[derive(Debug, Clone)]
pub struct Template {
    /// The parsed template AST.
    pub(crate) tree: TemplateTree,

    /// Original source (for error reporting).
    pub(crate) source: String,

    /// Non-fatal diagnostics found while compiling.
    pub(crate) warnings: Vec<Diagnostic>,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// # Returns
    /// A compiled template, or a [`CompileError`] carrying every problem
    /// found in the source.
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        Self::compile_with_options(source, &CompileOptions::default())
    }

    /// Compile a template using a non-default delimiter.
    pub fn compile_with_options(
        source: &str,
        options: &CompileOptions,
    ) -> Result<Self, CompileError> {
        options
            .validate()
            .map_err(|message| CompileError::new(vec![Diagnostic::error(message)]))?;

        let lexer = Lexer::with_delimiter(source, options.delimiter);
        let mut parser = Parser::new(lexer);
        let tree = parser.parse_template();
        let (errors, warnings): (Vec<_>, Vec<_>) =
            parser.into_diagnostics().into_iter().partition(Diagnostic::is_error);

        debug!(
            nodes = tree.nodes.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "compiled template"
        );

        if !errors.is_empty() {
            return Err(CompileError::new(errors));
        }

        Ok(Template {
            tree,
            source: source.to_string(),
            warnings,
        })
    }

    /// Read and compile a template file.
    ///
    /// Compile errors carry the file name so [`CompileError::report`] can
    /// label its output.
    pub fn compile_from_file(path: &Path) -> TemplateResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::compile(&source).map_err(|err| err.with_filename(path.display().to_string()).into())
    }

    /// Get the AST nodes of this template.
    pub fn nodes(&self) -> &[Node] {
        &self.tree.nodes
    }

    pub fn tree(&self) -> &TemplateTree {
        &self.tree
    }

    /// The source this template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Diagnostics that did not prevent compilation.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Builds a [`TemplateTree`] from a token stream.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut parser = Self {
            lexer,
            cur: Token::eof(0),
            peek: Token::eof(0),
            diagnostics: Vec::new(),
        };
        // Fill cur and peek
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Every diagnostic recorded so far, in source order.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Consume the whole token stream.
    pub fn parse_template(&mut self) -> TemplateTree {
        let mut tree = TemplateTree::default();
        while !self.cur.is(TokenKind::Eof) {
            if let Some(node) = self.parse_node() {
                tree.nodes.push(node);
            }
            self.next_token();
        }
        tree
    }

    fn parse_node(&mut self) -> Option<Node> {
        match self.cur.kind {
            TokenKind::Raw => Some(Node::Raw(RawText {
                text: self.cur.literal.clone(),
                span: span_of(&self.cur),
            })),
            TokenKind::Tag => self.parse_interpolation().map(Node::Interpolation),
            _ => None,
        }
    }

    /// Parse `%name(:constraint)*%` starting at the opening delimiter.
    ///
    /// On failure the parser is left on the closing delimiter (or the last
    /// token before end of input) and no node is produced.
    fn parse_interpolation(&mut self) -> Option<Interpolation> {
        let open = self.cur.clone();

        if !self.expect_peek(TokenKind::Ident) {
            self.skip_to_closing_tag();
            return None;
        }
        let name = Identifier {
            value: self.cur.literal.clone(),
            span: span_of(&self.cur),
        };

        let mut constraints: Vec<Constraint> = Vec::new();
        while self.peek.is(TokenKind::Colon) {
            self.next_token();

            if !self.peek.is(TokenKind::Ident) {
                let msg = format!("unknown constraint: {}", self.peek.literal);
                self.error_at_peek(msg);
                self.skip_to_closing_tag();
                return None;
            }
            self.next_token();

            let constraint = match self.cur.literal.as_str() {
                CONSTRAINT_INT => Constraint::new(CONSTRAINT_INT, span_of(&self.cur)),
                CONSTRAINT_LEN => self.parse_constraint_args(),
                other => {
                    let msg = format!("unknown constraint: {}", other);
                    self.diagnostics.push(Diagnostic::error_at(msg, span_of(&self.cur)));
                    // Skip any argument list so later constraints still parse.
                    self.parse_constraint_args();
                    continue;
                }
            };

            if constraints.iter().any(|c| c.name == constraint.name) {
                let msg = format!("duplicate constraint: {}", constraint.name);
                self.diagnostics.push(Diagnostic::warning_at(msg, constraint.span));
            }
            constraints.push(constraint);
        }

        if !self.expect_peek(TokenKind::Tag) {
            self.skip_to_closing_tag();
            return None;
        }

        Some(Interpolation {
            tag: open.literal.clone(),
            name,
            constraints,
            span: span_of(&open).join(span_of(&self.cur)),
        })
    }

    /// Parse an optional `(INT, INT, ...)` list after the constraint name
    /// under `cur`. A missing list yields a constraint with no arguments;
    /// arity is checked at evaluation.
    fn parse_constraint_args(&mut self) -> Constraint {
        let mut constraint = Constraint::new(self.cur.literal.clone(), span_of(&self.cur));

        if !self.peek.is(TokenKind::LParen) {
            return constraint;
        }
        self.next_token();

        loop {
            match self.peek.kind {
                TokenKind::RParen => {
                    self.next_token();
                    break;
                }
                TokenKind::Int => {
                    self.next_token();
                    constraint.args.push(self.cur.literal.clone());
                }
                TokenKind::Comma => self.next_token(),
                TokenKind::Eof | TokenKind::Tag => {
                    // Leave the delimiter for the interpolation to close on.
                    self.peek_error(TokenKind::RParen);
                    break;
                }
                _ => {
                    self.next_token();
                    let msg = format!(
                        "illegal token {} ({:?}) in constraint arguments",
                        self.cur.kind, self.cur.literal
                    );
                    self.diagnostics.push(Diagnostic::error_at(msg, span_of(&self.cur)));
                    self.recover_until(&[TokenKind::RParen, TokenKind::Tag]);
                    if self.peek.is(TokenKind::RParen) {
                        self.next_token();
                    }
                    break;
                }
            }
        }

        constraint.span = constraint.span.join(span_of(&self.cur));
        constraint
    }

    fn next_token(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lexer.next_token());
        trace!(kind = %self.cur.kind, literal = %self.cur.literal, "token");
    }

    /// Advance if `peek` is of `kind`; otherwise record a diagnostic.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if !self.peek.is(kind) {
            self.peek_error(kind);
            return false;
        }
        self.next_token();
        true
    }

    fn peek_error(&mut self, kind: TokenKind) {
        let msg = format!(
            "expected next token to be {}, got {} instead",
            kind, self.peek.kind
        );
        self.error_at_peek(msg);
    }

    fn error_at_peek(&mut self, message: String) {
        let span = span_of(&self.peek);
        self.diagnostics.push(Diagnostic::error_at(message, span));
    }

    /// Skip tokens until `peek` is one of `kinds` or end of input.
    fn recover_until(&mut self, kinds: &[TokenKind]) {
        while !kinds.contains(&self.peek.kind) && !self.peek.is(TokenKind::Eof) {
            self.next_token();
        }
    }

    /// Resynchronize on the next delimiter, consuming it.
    fn skip_to_closing_tag(&mut self) {
        self.recover_until(&[TokenKind::Tag]);
        if self.peek.is(TokenKind::Tag) {
            self.next_token();
        }
    }
}

fn span_of(tok: &Token) -> SourceSpan {
    SourceSpan::new(tok.start, tok.end)
}
