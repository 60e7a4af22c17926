//! Diagnostics and error reporting for scene files
//!
//! This module provides utilities for reporting parse errors,
//! analysis findings, and runtime errors to users.

use crate::parser::ParseError;
use std::fmt;

/// Byte range into the scene source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 0-indexed line containing the start of the span
    pub fn line(&self, source: &str) -> usize {
        let end = self.start.min(source.len());
        source.as_bytes()[..end].iter().filter(|b| **b == b'\n').count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(|d| !d.is_error())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

/// Format a parse error with context from the source code
pub fn format_parse_error(error: &ParseError, source: &str) -> String {
    let mut msg = format!("Parse error: {}", error);

    if let Some(span) = error.span() {
        let line = span.line(source);
        if let Some(text) = source.lines().nth(line) {
            msg.push_str(&format!("\n  at line {}: {}", line + 1, text));
        }
    }

    msg
}

/// Format a diagnostic, with the offending line when it carries a span
pub fn format_diagnostic(diagnostic: &Diagnostic, source: &str) -> String {
    let mut msg = diagnostic.to_string();
    if let Some(span) = diagnostic.span {
        let line = span.line(source);
        if let Some(text) = source.lines().nth(line) {
            msg.push_str(&format!("\n  at line {}: {}", line + 1, text.trim()));
        }
    }
    msg
}
