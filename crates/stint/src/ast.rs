/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! A parsed template is a flat, ordered list of [`Node`]s. Each node records
//! the byte range it was parsed from so that tooling can point back into the
//! source.

use serde::{Deserialize, Serialize};

/// A byte range in template source (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

/// A location in template source (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn join(self, other: SourceSpan) -> SourceSpan {
        SourceSpan::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Resolve the start of this span to a row and column in `source`.
    ///
    /// Offsets past the end of `source` are clamped to its length.
    pub fn start_location(&self, source: &str) -> Location {
        let mut offset = self.start.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let row = before.matches('\n').count();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count();
        Location {
            offset,
            row,
            column,
        }
    }
}

impl From<SourceSpan> for std::ops::Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// Name of the integer constraint.
pub const CONSTRAINT_INT: &str = "int";
/// Name of the length constraint.
pub const CONSTRAINT_LEN: &str = "len";

/// Root of a parsed template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateTree {
    /// Nodes in source order.
    pub nodes: Vec<Node>,
}

impl TemplateTree {
    /// Literal of the first token of the first node, or `""` when empty.
    pub fn token_literal(&self) -> &str {
        self.nodes.first().map_or("", Node::token_literal)
    }
}

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text to be output as-is.
    Raw(RawText),

    /// Variable interpolation: `%name%` or `%name:int:len(2)%`
    Interpolation(Interpolation),
}

impl Node {
    pub fn token_literal(&self) -> &str {
        match self {
            Node::Raw(raw) => &raw.text,
            Node::Interpolation(interp) => &interp.tag,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Node::Raw(raw) => raw.span,
            Node::Interpolation(interp) => interp.span,
        }
    }

    pub fn as_interpolation(&self) -> Option<&Interpolation> {
        match self {
            Node::Interpolation(interp) => Some(interp),
            Node::Raw(_) => None,
        }
    }
}

/// Literal text node.
#[derive(Debug, Clone, PartialEq)]
pub struct RawText {
    pub text: String,
    pub span: SourceSpan,
}

/// A variable name inside a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub span: SourceSpan,
}

/// A reference to a caller-supplied variable, validated by its constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    /// The opening delimiter as written.
    pub tag: String,
    pub name: Identifier,
    /// Constraints in declaration order; all must pass.
    pub constraints: Vec<Constraint>,
    /// From the opening to the closing delimiter, inclusive.
    pub span: SourceSpan,
}

impl Interpolation {
    /// The variable name this interpolation resolves.
    pub fn name(&self) -> &str {
        &self.name.value
    }
}

/// Typed view of a constraint name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `int`: the value must be a base-10 integer.
    Int,
    /// `len`, `len(n)` or `len(min, max)`: bounds the value's length.
    Len,
    Unknown,
}

/// A validation rule attached to an interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    /// Arguments as written; integers are checked at evaluation.
    pub args: Vec<String>,
    pub span: SourceSpan,
}

impl Constraint {
    pub fn new(name: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            span,
        }
    }

    pub fn with_args(name: impl Into<String>, args: Vec<String>, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            args,
            span,
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        match self.name.as_str() {
            CONSTRAINT_INT => ConstraintKind::Int,
            CONSTRAINT_LEN => ConstraintKind::Len,
            _ => ConstraintKind::Unknown,
        }
    }
}
