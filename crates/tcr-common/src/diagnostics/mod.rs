//! Diagnostic types and message lookup for the completion stage.
//!
//! Message data lives in `data.rs`. Diagnostics are anchored to the
//! surface-syntax node they are reported on; rendering to file positions is
//! the business of the sink that eventually receives them.

use crate::node::NodeId;
use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// Related information for a diagnostic (e.g., "see also" locations).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub node: NodeId,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A completion diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub node: NodeId,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    /// Related information (e.g., where the missing supertype was required)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(node: NodeId, message: String, code: u32) -> Self {
        Self {
            node,
            message_text: message,
            category: DiagnosticCategory::Error,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a diagnostic from a registered code, filling `{0}`, `{1}`, ...
    ///
    /// Unknown codes produce an error diagnostic with the raw arguments joined.
    #[must_use]
    pub fn from_code(node: NodeId, code: u32, args: &[&str]) -> Self {
        match get_diagnostic_message(code) {
            Some(message) => Self {
                node,
                message_text: format_message(message.message, args),
                category: message.category,
                code,
                related_information: Vec::new(),
            },
            None => Self::error(node, args.join(" "), code),
        }
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, node: NodeId, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            node,
            message_text: message,
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod tests;
