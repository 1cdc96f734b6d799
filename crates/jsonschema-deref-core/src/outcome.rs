//! Result of resolving a single `$ref`.
//!
//! Resolution steps return a [`RefOutcome`] so the reason for a failure stays
//! attached to it. The tree rewrite collapses `Unresolved` into the
//! placeholder `{"$ref": locator}` and records the matching
//! [`Diagnostic`].

use serde_json::{Map, Value};

use crate::diagnostic::{Diagnostic, DiagnosticKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RefOutcome {
    /// Fully resolved target content.
    Resolved(Value),
    /// The reference is kept as-is.
    Unresolved {
        locator: String,
        reason: DiagnosticKind,
        detail: Option<String>,
    },
}

impl RefOutcome {
    pub fn unresolved(locator: &str, reason: DiagnosticKind) -> Self {
        RefOutcome::Unresolved {
            locator: locator.to_string(),
            reason,
            detail: None,
        }
    }

    /// Split into the substitute value and, when unresolved, its diagnostic.
    pub fn into_parts(self) -> (Value, Option<Diagnostic>) {
        match self {
            RefOutcome::Resolved(value) => (value, None),
            RefOutcome::Unresolved {
                locator,
                reason,
                detail,
            } => {
                let value = placeholder(&locator);
                (value, Some(Diagnostic::new(&locator, reason, detail)))
            }
        }
    }
}

/// `{"$ref": locator}`
pub(crate) fn placeholder(locator: &str) -> Value {
    Value::Object(Map::from_iter([(
        "$ref".to_string(),
        Value::String(locator.to_string()),
    )]))
}
