/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation and evaluation.
//!
//! A malformed template is a [`CompileError`]; bad input data is an
//! [`EvalError`]. The two never share a variant.

use std::fmt;

use thiserror::Error;

use crate::diagnostic::Diagnostic;

/// Every problem found while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}parser errors: {}", file_prefix(.filename.as_deref()), join_messages(.diagnostics))]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
    /// The file the template was read from, when there was one.
    pub filename: Option<String>,
}

impl CompileError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// The diagnostic messages, in the order they were found.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    /// Render every diagnostic against `source` with ariadne.
    pub fn render_report(&self, source: &str, filename: &str) -> String {
        self.diagnostics
            .iter()
            .map(|d| d.to_text(source, filename))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render every diagnostic against `source`, labelled with the recorded
    /// file name (or `<template>` for in-memory sources).
    pub fn report(&self, source: &str) -> String {
        self.render_report(source, self.filename.as_deref().unwrap_or("<template>"))
    }
}

fn file_prefix(filename: Option<&str>) -> String {
    filename
        .map(|name| format!("{}: ", name))
        .unwrap_or_default()
}

fn join_messages(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// The first failure hit while executing a template.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("variable {name} not found")]
    VariableNotFound { name: String },

    #[error("int constraint: value {value} must be an integer")]
    NotAnInteger { variable: String, value: String },

    #[error("len constraint: missing argument(s)")]
    MissingArguments { variable: String },

    #[error("len constraint: argument {argument} must be an integer")]
    InvalidArgument { variable: String, argument: String },

    #[error("len constraint: expected length {expected}, got {actual}")]
    LengthMismatch {
        variable: String,
        expected: i64,
        actual: usize,
    },

    #[error("len constraint: length {actual} outside range {min}-{max}")]
    LengthOutOfRange {
        variable: String,
        actual: usize,
        min: i64,
        max: i64,
    },

    #[error("len constraint: invalid arguments: {}", .args.join(","))]
    InvalidArguments { variable: String, args: Vec<String> },

    #[error("unknown constraint: {name}({})", .args.join(","))]
    UnknownConstraint {
        variable: String,
        name: String,
        args: Vec<String>,
    },

    /// The output sink refused a write.
    #[error("failed to write output: {0}")]
    Write(#[from] fmt::Error),
}

impl EvalError {
    /// The variable whose resolution or validation failed.
    pub fn variable(&self) -> Option<&str> {
        match self {
            EvalError::VariableNotFound { name } => Some(name),
            EvalError::NotAnInteger { variable, .. }
            | EvalError::MissingArguments { variable }
            | EvalError::InvalidArgument { variable, .. }
            | EvalError::LengthMismatch { variable, .. }
            | EvalError::LengthOutOfRange { variable, .. }
            | EvalError::InvalidArguments { variable, .. }
            | EvalError::UnknownConstraint { variable, .. } => Some(variable),
            EvalError::Write(_) => None,
        }
    }
}

/// A JSON value that cannot be turned into an [`Environment`](crate::Environment).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("environment must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    #[error("variable {key} has unsupported {kind} value")]
    UnsupportedValue { key: String, kind: &'static str },
}

/// Errors from the one-shot helpers that both compile and evaluate.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    /// I/O error (e.g., reading a template file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_joins_messages() {
        let err = CompileError::new(vec![
            Diagnostic::error("expected next token to be IDENT, got TAG instead"),
            Diagnostic::error("unknown constraint: upper"),
        ]);
        assert_eq!(
            err.to_string(),
            "parser errors: expected next token to be IDENT, got TAG instead; unknown constraint: upper"
        );
    }

    #[test]
    fn test_eval_error_messages() {
        let err = EvalError::LengthOutOfRange {
            variable: "code".into(),
            actual: 2,
            min: 3,
            max: 5,
        };
        assert_eq!(err.to_string(), "len constraint: length 2 outside range 3-5");
        assert_eq!(err.variable(), Some("code"));

        let err = EvalError::UnknownConstraint {
            variable: "x".into(),
            name: "upper".into(),
            args: vec!["1".into(), "2".into()],
        };
        assert_eq!(err.to_string(), "unknown constraint: upper(1,2)");
    }

    #[test]
    fn test_template_error_keeps_classes_apart() {
        let err: TemplateError = EvalError::VariableNotFound {
            name: "name".into(),
        }
        .into();
        assert!(matches!(err, TemplateError::Eval(_)));
        assert_eq!(err.to_string(), "variable name not found");

        let err: TemplateError = CompileError::new(vec![Diagnostic::error("x")]).into();
        assert!(matches!(err, TemplateError::Compile(_)));
    }

    #[test]
    fn test_compile_error_with_filename() {
        let err = CompileError::new(vec![Diagnostic::error("unknown constraint: upper")])
            .with_filename("letter.template");
        assert_eq!(
            err.to_string(),
            "letter.template: parser errors: unknown constraint: upper"
        );
        assert_eq!(err.report(""), "letter.template: unknown constraint: upper");

        let err: TemplateError = err.into();
        assert!(matches!(err, TemplateError::Compile(_)));
    }
}
