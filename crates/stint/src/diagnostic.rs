/*
 * diagnostic.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compile-time diagnostics.
//!
//! The parser never stops at the first problem; it records a [`Diagnostic`]
//! for each one and keeps going. Diagnostics carry the byte range of the
//! offending token so they can be rendered against the template source.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::ast::SourceSpan;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// A problem that makes the template unusable.
    Error,
    /// A suspicious construct that still compiles.
    Warning,
}

/// A single problem found while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::Error,
            message: message.into(),
            span: None,
        }
    }

    pub fn error_at(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::error(message).with_span(span)
    }

    pub fn warning_at(message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind: DiagnosticKind::Warning,
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Render this diagnostic with source context using ariadne.
    ///
    /// Diagnostics without a span fall back to `"{filename}: {message}"`.
    pub fn to_text(&self, source: &str, filename: &str) -> String {
        use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

        let Some(span) = self.span else {
            return format!("{}: {}", filename, self.message);
        };

        let (report_kind, color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let range = underline_range(source, span);
        let report = Report::build(report_kind, filename.to_string(), range.start)
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(&self.message)
            .with_label(
                Label::new((filename.to_string(), range))
                    .with_message(&self.message)
                    .with_color(color),
            )
            .finish();

        let mut output = Vec::new();
        match report.write((filename.to_string(), Source::from(source)), &mut output) {
            Ok(()) => String::from_utf8_lossy(&output).into_owned(),
            Err(_) => format!("{}: {}", filename, self.message),
        }
    }
}

/// Clamp `span` to `source` and widen zero-width spans (end of input) so
/// there is a character to underline.
fn underline_range(source: &str, span: SourceSpan) -> Range<usize> {
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let mut range: Range<usize> = SourceSpan::new(start, end).into();
    if range.is_empty() {
        if let Some(c) = source[start..].chars().next() {
            range.end += c.len_utf8();
        } else if let Some(c) = source[..start].chars().next_back() {
            range.start -= c.len_utf8();
        }
    }
    range
}
