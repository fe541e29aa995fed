/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! String templates with per-variable validation constraints.
//!
//! A template is plain text with tags delimited by `%`. Each tag names a
//! variable and may attach constraints that the variable's value must
//! satisfy before it is substituted:
//!
//! - Variable interpolation: `%name%`
//! - Integer check: `%age:int%`
//! - Exact length: `%pin:len(4)%`
//! - Length range: `%code:len(3, 5)%`
//! - Chained constraints, checked left to right: `%zip:int:len(5)%`
//!
//! Text outside tags is copied verbatim; there is no escaping.
//!
//! # Errors
//!
//! Compilation reports every syntax problem at once as a [`CompileError`].
//! Evaluation stops at the first missing variable or failing constraint with
//! an [`EvalError`]. A malformed template and bad input data are never
//! reported through the same error type.
//!
//! # Example
//!
//! ```
//! use stint::{Environment, Template};
//!
//! let template = Template::compile("Order %id:int:len(4)% for %name%").unwrap();
//!
//! let mut env = Environment::new();
//! env.insert("id", "1234");
//! env.insert("name", "Alice");
//!
//! assert_eq!(template.render(&env).unwrap(), "Order 1234 for Alice");
//!
//! env.insert("id", "12x4");
//! assert!(template.render(&env).is_err());
//! ```

pub mod ast;
pub mod context;
pub mod diagnostic;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod token;

// Re-export main types at crate root
pub use ast::{
    Constraint, ConstraintKind, Identifier, Interpolation, Location, Node, RawText, SourceSpan,
    TemplateTree,
};
pub use context::Environment;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{CompileError, EnvironmentError, EvalError, TemplateError, TemplateResult};
pub use evaluator::{check_constraint, render};
pub use lexer::Lexer;
pub use options::CompileOptions;
pub use parser::{Parser, Template};
pub use token::{Token, TokenKind};
