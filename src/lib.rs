//! tcr: the completion stage of call resolution.
//!
//! Re-exports the workspace crates under one roof and adds the driver entry
//! point plus tracing setup.

use std::sync::Arc;
use tracing::debug_span;

// Node identities, interned names, diagnostics and limits
pub use tcr_common as common;
pub use tcr_common::{Atom, Diagnostic, DiagnosticCategory, Interner, NodeId};

// Type layer: interning, substitution, subtyping, approximation
pub use tcr_solver as solver;
pub use tcr_solver::{InferenceSubstitutor, TypeDatabase, TypeId, TypeInterner};

// Completion pass over atom trees
pub use tcr_completer as completer;
pub use tcr_completer::{
    AtomCompleter, AtomId, AtomTree, BindingStore, CompletionContext, CompletionError,
    CompletionOptions, ResolvedCall,
};

// Tracing subscriber configuration (TCR_LOG / TCR_LOG_FORMAT)
pub mod tracing_config;
#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;

/// Complete one top-level expression against its solved substitutor.
///
/// Everything below `root` is completed children first; a call at the root
/// is returned finalized. Diagnostics go to the context's sink.
pub fn complete_expression(
    context: CompletionContext<'_>,
    substitutor: &InferenceSubstitutor,
    tree: &mut AtomTree,
    root: AtomId,
) -> Result<Option<Arc<ResolvedCall>>, CompletionError> {
    let _span = debug_span!("complete_expression", root = root.0, atoms = tree.len()).entered();
    AtomCompleter::new(context, substitutor).complete_top_level(tree, root, Vec::new())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod lib_tests;
