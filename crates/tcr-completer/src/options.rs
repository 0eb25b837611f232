//! Completion options.

use serde::Deserialize;
use tcr_common::limits::MAX_SUBSTITUTION_DEPTH;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CompletionOptions {
    /// Report `TYPE_MISMATCH` when a retyped expression does not satisfy its
    /// new expected type.
    pub report_type_mismatch: bool,
    /// Check error candidates' receivers for supertypes missing from the
    /// class table.
    pub check_missing_supertypes: bool,
    pub max_substitution_depth: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            report_type_mismatch: true,
            check_missing_supertypes: true,
            max_substitution_depth: MAX_SUBSTITUTION_DEPTH,
        }
    }
}

impl CompletionOptions {
    /// Parse options from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
