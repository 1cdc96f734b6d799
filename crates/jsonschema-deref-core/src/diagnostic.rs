//! Diagnostics emitted while resolving references.
//!
//! Resolution is fail-open: a reference that cannot be inlined is left as a
//! `{"$ref": ...}` placeholder. Each such event is recorded as a
//! [`Diagnostic`] and logged through `tracing` for operators.

use serde::{Deserialize, Serialize};

/// A reference that was left unresolved, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The `$ref` value that could not be inlined.
    pub locator: String,
    /// Classification of the problem.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

/// Classification of resolution diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No `.json` file name could be taken from an external locator.
    UnresolvableFileName,
    /// The external schema file could not be read or parsed.
    SchemaLoadFailed {
        /// File name looked up in the schema directory.
        file: String,
    },
    /// An internal pointer does not lead anywhere in the root document.
    DanglingPointer,
    /// The locator was met again while it was still being resolved.
    Cycle,
    /// The pointer target contains a `$ref` to the pointer itself.
    SelfReference,
    /// The reference sits deeper in the rewritten tree than `max_depth`.
    DepthExceeded {
        /// The configured limit.
        max_depth: usize,
    },
}

impl DiagnosticKind {
    /// Errors are load failures; everything else is a warning.
    pub fn is_error(&self) -> bool {
        matches!(self, DiagnosticKind::SchemaLoadFailed { .. })
    }
}

impl Diagnostic {
    pub(crate) fn new(locator: &str, kind: DiagnosticKind, detail: Option<String>) -> Self {
        let summary = match &kind {
            DiagnosticKind::UnresolvableFileName => {
                "could not extract schema file name from reference".to_string()
            }
            DiagnosticKind::SchemaLoadFailed { file } => format!("error loading schema {file}"),
            DiagnosticKind::DanglingPointer => "could not resolve internal reference".to_string(),
            DiagnosticKind::Cycle => "circular reference detected".to_string(),
            DiagnosticKind::SelfReference => "self-referencing schema detected".to_string(),
            DiagnosticKind::DepthExceeded { max_depth } => {
                format!("maximum resolution depth exceeded (max: {max_depth})")
            }
        };
        let message = match detail {
            Some(detail) => format!("{summary}: {detail}"),
            None => summary,
        };
        Self {
            locator: locator.to_string(),
            kind,
            message,
        }
    }

    /// Emit this diagnostic as a `tracing` event.
    pub(crate) fn log(&self) {
        match &self.kind {
            DiagnosticKind::SchemaLoadFailed { file } => {
                tracing::error!(locator = %self.locator, file = %file, "{}", self.message);
            }
            kind => {
                tracing::warn!(locator = %self.locator, kind = ?kind, "{}", self.message);
            }
        }
    }
}
