/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compile-time configuration.

use serde::{Deserialize, Serialize};

use crate::lexer::is_ident_char;

/// The delimiter used when no other is configured.
pub const DEFAULT_DELIMITER: char = '%';

/// Options controlling how template source is compiled.
///
/// Deserializable so that hosts can embed it in their own configuration
/// files; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Character that opens and closes a tag.
    pub delimiter: char,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Check that the delimiter cannot be confused with tag contents.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let d = self.delimiter;
        if is_ident_char(d)
            || d.is_ascii_digit()
            || d.is_whitespace()
            || matches!(d, ':' | ',' | '(' | ')')
        {
            return Err(format!("invalid delimiter {:?}", d));
        }
        Ok(())
    }
}
