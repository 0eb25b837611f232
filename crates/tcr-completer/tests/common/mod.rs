//! Shared fixture for completion tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tcr_common::{Atom, NodeId};
use tcr_completer::*;
use tcr_solver::{
    ClassId, ClassInfo, InferenceSubstitutor, TypeDatabase, TypeId, TypeInterner, TypeParamId,
};

pub struct Fixture {
    pub types: TypeInterner,
    pub store: BindingStore,
    pub sink: CollectingSink,
    pub session: DefaultInferenceSession,
    pub typing: RecordedTypes,
    pub checkers: StandardCallCheckers,
    pub substitutor: InferenceSubstitutor,
    next_node: u32,
}

/// Route completion logs to the test harness; filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        Self {
            types: TypeInterner::new(),
            store: BindingStore::new(),
            sink: CollectingSink::new(),
            session: DefaultInferenceSession,
            typing: RecordedTypes,
            checkers: StandardCallCheckers,
            substitutor: InferenceSubstitutor::new(),
            next_node: 1,
        }
    }

    pub fn node(&mut self) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        node
    }

    pub fn name(&self, s: &str) -> Atom {
        self.types.intern_string(s)
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            session: &self.session,
            typing: &self.typing,
            checkers: &self.checkers,
            sink: &self.sink,
        }
    }

    pub fn context(&self) -> CompletionContext<'_> {
        CompletionContext::new(&self.types, &self.store, self.collaborators())
    }

    pub fn completer(&self) -> AtomCompleter<'_> {
        AtomCompleter::new(self.context(), &self.substitutor)
    }

    pub fn completer_with<'a>(&'a self, collaborators: Collaborators<'a>) -> AtomCompleter<'a> {
        AtomCompleter::new(
            CompletionContext::new(&self.types, &self.store, collaborators),
            &self.substitutor,
        )
    }

    /// `class List<T>`
    pub fn list_class(&self) -> (ClassId, TypeParamId) {
        let t = self.types.fresh_type_param("T", TypeId::ANY);
        let list = self
            .types
            .register_class(ClassInfo::new(self.name("List")).with_type_params(vec![t]));
        (list, t)
    }

    /// A class with no type parameters.
    pub fn class(&self, name: &str) -> TypeId {
        let class = self.types.register_class(ClassInfo::new(self.name(name)));
        self.types.class_type(class, &[])
    }

    pub fn call_atom(&self, node: NodeId, callee: NodeId, candidate: Candidate) -> ResolvedAtom {
        ResolvedAtom::new(
            node,
            AtomKind::Call(CallAtom {
                call: CallSite::new(node, callee),
                candidate,
                diagnostics: Vec::new(),
            }),
        )
    }

    pub fn sub_call_atom(&self, node: NodeId) -> ResolvedAtom {
        ResolvedAtom::new(
            node,
            AtomKind::SubCallArgument(SubCallArgumentAtom {
                expression: Some(node),
            }),
        )
    }

    /// A no-argument, non-generic function returning `Unit`.
    pub fn simple_function(&self, name: &str) -> Arc<CallableDescriptor> {
        Arc::new(CallableDescriptor::function(self.name(name), Vec::new(), TypeId::UNIT))
    }
}

/// Session that records the node of every atom about to be completed and
/// claims the ones listed in `completed`.
#[derive(Default)]
pub struct RecordingSession {
    pub seen: Mutex<Vec<NodeId>>,
    pub completed: Vec<NodeId>,
}

impl InferenceSession for RecordingSession {
    fn call_completed(&self, atom: &ResolvedAtom) -> bool {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(atom.node);
        }
        self.completed.contains(&atom.node)
    }
}

impl RecordingSession {
    pub fn seen(&self) -> Vec<NodeId> {
        self.seen.lock().unwrap().clone()
    }
}

/// Checkers that only record what they were run on.
#[derive(Default)]
pub struct RecordingCheckers {
    pub argument_checks: Mutex<Vec<NodeId>>,
    pub call_checks: Mutex<Vec<(NodeId, ExpectedType)>>,
    pub receiver_checks: Mutex<Vec<NodeId>>,
}

impl CallCheckers for RecordingCheckers {
    fn run_arguments_checks(
        &self,
        call: &ResolvedCall,
        _context: &CallCheckerContext<'_>,
        _diagnostics: &mut Vec<tcr_common::Diagnostic>,
    ) {
        self.argument_checks.lock().unwrap().push(call.call.call_element);
    }

    fn run_call_checkers(
        &self,
        call: &ResolvedCall,
        context: &CallCheckerContext<'_>,
        _diagnostics: &mut Vec<tcr_common::Diagnostic>,
    ) {
        self.call_checks
            .lock()
            .unwrap()
            .push((call.call.call_element, context.resolution.expected_type));
    }

    fn run_additional_receiver_checks(
        &self,
        call: &ResolvedCall,
        _context: &CallCheckerContext<'_>,
        _diagnostics: &mut Vec<tcr_common::Diagnostic>,
    ) {
        self.receiver_checks.lock().unwrap().push(call.call.call_element);
    }
}

/// Typing service answering from a fixed table and recording the contexts
/// it was asked under.
#[derive(Default)]
pub struct TableTyping {
    pub types: Vec<(NodeId, TypeId)>,
    pub requests: Mutex<Vec<(NodeId, ExpressionContext)>>,
}

impl ExpressionTypingServices for TableTyping {
    fn get_type_info(
        &self,
        expression: NodeId,
        context: &ExpressionContext,
        _store: &BindingStore,
    ) -> ExpressionTypeInfo {
        self.requests
            .lock()
            .unwrap()
            .push((expression, context.clone()));
        let ty = self
            .types
            .iter()
            .find(|(node, _)| *node == expression)
            .map(|(_, ty)| *ty);
        ExpressionTypeInfo::new(ty, context.data_flow.clone())
    }
}
