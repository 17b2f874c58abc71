//! Diagnostics collected while parsing a property set.
//!
//! The parser never stops on a user error unless the error leaves it no
//! context to continue in. Each problem is recorded here with a kind, a
//! severity and the line it was found on, and is logged as it is emitted.

use std::fmt;

use crate::error::ParseContext;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Missing colon or brace, premature end of input, wrong first keyword.
    Structural,
    /// A word outside the vocabulary expected at that point.
    Vocabulary,
    /// A keyword used where its required context is missing.
    Context,
    /// A `requires` target that no property in the file defines.
    Reference,
    /// A property name declared more than once.
    Duplicate,
    /// The parser reached a state it has no rule for.
    Internal,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::Internal => Severity::Fatal,
            _ => Severity::Recoverable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Vocabulary => "vocabulary",
            Self::Context => "context",
            Self::Reference => "reference",
            Self::Duplicate => "duplicate",
            Self::Internal => "internal",
        }
    }
}

/// Whether parsing continued past the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Reported, then scanning resumed at the next statement boundary.
    Recoverable,
    /// Reported, then scanning stopped.
    Fatal,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// A single recorded problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub line: usize,
    /// `<file>:<line>: ` prefix, rendered when the diagnostic was emitted.
    pub leader: String,
    pub message: String,
}

impl Diagnostic {
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.leader, self.message)
    }
}

/// Ordered collection of diagnostics for one file.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    ctx: ParseContext,
    messages: Vec<Diagnostic>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    diagnostic: Diagnostic,
}

impl Diagnostics {
    pub fn new(ctx: ParseContext) -> Self {
        Self {
            ctx,
            messages: Vec::new(),
        }
    }

    /// Start a diagnostic of `kind` at `line` with the kind's default severity.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        line: usize,
        message: impl Into<String>,
    ) -> DiagnosticBuilder<'_> {
        let leader = self.ctx.error_leader(line);
        DiagnosticBuilder {
            diagnostics: self,
            diagnostic: Diagnostic {
                kind,
                severity: kind.default_severity(),
                line,
                leader,
                message: message.into(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_fatal)
    }

    /// Number of diagnostics of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.messages.iter().filter(|d| d.kind == kind).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl DiagnosticBuilder<'_> {
    /// Mark the diagnostic as stopping the parse.
    pub fn fatal(mut self) -> Self {
        self.diagnostic.severity = Severity::Fatal;
        self
    }

    pub fn emit(self) {
        let d = self.diagnostic;
        tracing::warn!(
            target: "propset::diagnostics",
            kind = d.kind.as_str(),
            severity = %d.severity,
            line = d.line,
            "{}",
            d
        );
        self.diagnostics.messages.push(d);
    }
}
