//! Contexts threaded through one completion pass.

use crate::binding::BindingStore;
use crate::collaborators::{CallCheckers, DiagnosticSink, ExpressionTypingServices, InferenceSession};
use crate::options::CompletionOptions;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tcr_common::{Diagnostic, NodeId};
use tcr_solver::{TypeDatabase, TypeId};

/// Smart-cast facts known at a program point: expression -> narrowed type.
///
/// Completion never inspects these; it only carries the facts recorded after
/// each argument into the types it writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataFlowInfo {
    facts: Arc<FxHashMap<NodeId, TypeId>>,
}

impl DataFlowInfo {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_fact(&self, node: NodeId, ty: TypeId) -> Self {
        let mut facts = (*self.facts).clone();
        facts.insert(node, ty);
        Self {
            facts: Arc::new(facts),
        }
    }

    pub fn narrowed_type(&self, node: NodeId) -> Option<TypeId> {
        self.facts.get(&node).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpectedType {
    #[default]
    NoExpectedType,
    Type(TypeId),
}

impl ExpectedType {
    /// The expected type, unless there is none.
    pub fn concrete(self) -> Option<TypeId> {
        match self {
            ExpectedType::NoExpectedType => None,
            ExpectedType::Type(ty) => Some(ty),
        }
    }
}

impl From<Option<TypeId>> for ExpectedType {
    fn from(ty: Option<TypeId>) -> Self {
        ty.map_or(ExpectedType::NoExpectedType, ExpectedType::Type)
    }
}

/// Whether an expression's type may still depend on the enclosing call's
/// inference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContextDependency {
    #[default]
    Independent,
    Dependent,
}

/// What an expression is typed against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionContext {
    pub expected_type: ExpectedType,
    pub data_flow: DataFlowInfo,
    pub dependency: ContextDependency,
}

impl ExpressionContext {
    pub fn new(expected_type: ExpectedType) -> Self {
        Self {
            expected_type,
            ..Self::default()
        }
    }

    pub fn replace_expected_type(&self, expected_type: ExpectedType) -> Self {
        Self {
            expected_type,
            ..self.clone()
        }
    }

    pub fn replace_data_flow(&self, data_flow: DataFlowInfo) -> Self {
        Self {
            data_flow,
            ..self.clone()
        }
    }

    pub fn replace_context_dependency(&self, dependency: ContextDependency) -> Self {
        Self {
            dependency,
            ..self.clone()
        }
    }
}

/// Diagnostics recorded for a call that constraint collection resolved
/// partially (before the outer inference finished).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialCallContainer {
    pub diagnostics: Vec<Diagnostic>,
}

/// Partially resolved calls of one top-level expression, keyed by call node,
/// and the calls this pass has already finalized.
#[derive(Debug, Default)]
pub struct PartialCallTable {
    entries: FxHashMap<NodeId, PartialCallContainer>,
    finalized: FxHashSet<NodeId>,
}

impl PartialCallTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, call: NodeId, diagnostics: Vec<Diagnostic>) {
        self.entries
            .entry(call)
            .or_default()
            .diagnostics
            .extend(diagnostics);
    }

    pub fn diagnostics(&self, call: NodeId) -> &[Diagnostic] {
        self.entries
            .get(&call)
            .map(|container| container.diagnostics.as_slice())
            .unwrap_or_default()
    }

    /// Take the diagnostics of `call`, leaving an empty container behind.
    pub fn take(&mut self, call: NodeId) -> Vec<Diagnostic> {
        match self.entries.get_mut(&call) {
            Some(container) => std::mem::take(&mut container.diagnostics),
            None => Vec::new(),
        }
    }

    pub fn contains(&self, call: NodeId) -> bool {
        self.entries.contains_key(&call)
    }

    /// Returns true the first time `call` is finalized in this pass.
    pub fn mark_finalized(&mut self, call: NodeId) -> bool {
        self.finalized.insert(call)
    }

    pub fn is_finalized(&self, call: NodeId) -> bool {
        self.finalized.contains(&call)
    }
}

/// External services a completion pass consumes.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub session: &'a dyn InferenceSession,
    pub typing: &'a dyn ExpressionTypingServices,
    pub checkers: &'a dyn CallCheckers,
    pub sink: &'a dyn DiagnosticSink,
}

/// The top-level call context: everything one completion pass of one
/// top-level expression needs, besides the atom tree and the substitutor.
pub struct CompletionContext<'a> {
    pub db: &'a dyn TypeDatabase,
    pub store: &'a BindingStore,
    pub collaborators: Collaborators<'a>,
    pub call_context: ExpressionContext,
    pub options: CompletionOptions,
    pub partial_calls: PartialCallTable,
}

impl<'a> CompletionContext<'a> {
    pub fn new(
        db: &'a dyn TypeDatabase,
        store: &'a BindingStore,
        collaborators: Collaborators<'a>,
    ) -> Self {
        Self {
            db,
            store,
            collaborators,
            call_context: ExpressionContext::default(),
            options: CompletionOptions::default(),
            partial_calls: PartialCallTable::new(),
        }
    }

    pub fn with_call_context(mut self, call_context: ExpressionContext) -> Self {
        self.call_context = call_context;
        self
    }

    pub fn with_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_partial_calls(mut self, partial_calls: PartialCallTable) -> Self {
        self.partial_calls = partial_calls;
        self
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
