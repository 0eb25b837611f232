//! The resolved-atom tree built by constraint collection.
//!
//! Atoms live in an arena (`AtomTree`) and refer to their children by
//! `AtomId`. Child order is dependency order: a parent may read what its
//! children finalized.

use crate::candidate::{Candidate, CallableReferenceCandidate, ReceiverValue};
use crate::context::{DataFlowInfo, ExpressionContext};
use smallvec::SmallVec;
use tcr_common::{Diagnostic, NodeId};
use tcr_solver::TypeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallSiteKind {
    Regular,
    /// Reading the variable half of a `variable(args)` invoke desugaring;
    /// only used to pick between the variable and a function.
    VariableForInvoke,
    /// The `invoke` half; constraint collection stored its state on the base call.
    Invoke { base_call: NodeId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub node: NodeId,
    pub callee: NodeId,
    pub kind: CallSiteKind,
    pub explicit_receiver: Option<ReceiverValue>,
    pub value_arguments: Vec<NodeId>,
}

impl CallSite {
    pub fn new(node: NodeId, callee: NodeId) -> Self {
        Self {
            node,
            callee,
            kind: CallSiteKind::Regular,
            explicit_receiver: None,
            value_arguments: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: CallSiteKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_explicit_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.explicit_receiver = Some(receiver);
        self
    }

    pub fn with_value_arguments(mut self, arguments: Vec<NodeId>) -> Self {
        self.value_arguments = arguments;
        self
    }

    /// Node under which constraint collection stored the call's partial
    /// resolution context.
    pub fn resolution_context_key(&self) -> NodeId {
        match self.kind {
            CallSiteKind::Invoke { base_call } => base_call,
            CallSiteKind::Regular | CallSiteKind::VariableForInvoke => self.node,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CallAtom {
    pub call: CallSite,
    pub candidate: Candidate,
    /// Diagnostics collected for this call during constraint collection.
    pub diagnostics: Vec<Diagnostic>,
}

/// The syntax a lambda atom was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LambdaArgument {
    /// `{ x -> ... }`: the literal expression and its function node.
    Literal { expression: NodeId, function: NodeId },
    /// `fun(x) { ... }`; `named` when it is a named function statement.
    AnonymousFunction { function: NodeId, named: bool },
    /// Anything else constraint collection attached a lambda atom to.
    Other { node: NodeId },
}

/// A return point of a lambda body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LambdaResultArgument {
    pub expression: Option<NodeId>,
    /// Type collected for the returned value, if it is a simple argument.
    pub ty: Option<TypeId>,
    pub data_flow_after: DataFlowInfo,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultArgumentsInfo {
    /// Return points whose expression typed without errors.
    pub non_error_arguments: Vec<LambdaResultArgument>,
    /// Whether the body has any return point at all (including an implicit
    /// last expression).
    pub return_arguments_exist: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LambdaAtom {
    pub argument: LambdaArgument,
    pub is_suspend: bool,
    /// Types fixed by inference; `None` where inference left them open.
    pub receiver: Option<TypeId>,
    pub parameters: Option<Vec<TypeId>>,
    pub return_type: Option<TypeId>,
    /// `None` for a wrapper atom whose single child lambda owns the body.
    pub result_arguments: Option<ResultArgumentsInfo>,
}

impl LambdaAtom {
    pub fn new(argument: LambdaArgument) -> Self {
        Self {
            argument,
            is_suspend: false,
            receiver: None,
            parameters: None,
            return_type: None,
            result_arguments: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<TypeId>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_receiver(mut self, receiver: TypeId) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_return_type(mut self, return_type: TypeId) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_result_arguments(mut self, info: ResultArgumentsInfo) -> Self {
        self.result_arguments = Some(info);
        self
    }

    pub fn suspend(mut self) -> Self {
        self.is_suspend = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct CallableReferenceAtom {
    /// The whole `a::b` expression.
    pub expression: NodeId,
    /// The `b` part.
    pub callee: NodeId,
    pub data_flow_after: DataFlowInfo,
    pub candidate: Option<CallableReferenceCandidate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionLiteralAtom {
    pub expression: NodeId,
    /// Expected type collected for the literal, still mentioning inference
    /// variables.
    pub expected_type: Option<TypeId>,
    /// Context of the call the literal is an argument of.
    pub outer_context: ExpressionContext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubCallArgumentAtom {
    pub expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub enum AtomKind {
    Call(CallAtom),
    Lambda(LambdaAtom),
    CallableReference(CallableReferenceAtom),
    CollectionLiteral(CollectionLiteralAtom),
    SubCallArgument(SubCallArgumentAtom),
}

impl AtomKind {
    pub fn name(&self) -> &'static str {
        match self {
            AtomKind::Call(_) => "call",
            AtomKind::Lambda(_) => "lambda",
            AtomKind::CallableReference(_) => "callable_reference",
            AtomKind::CollectionLiteral(_) => "collection_literal",
            AtomKind::SubCallArgument(_) => "sub_call_argument",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ResolvedAtom {
    pub node: NodeId,
    pub kind: AtomKind,
    /// Constraint collection finished this atom; unanalyzed branches are
    /// skipped entirely.
    pub analyzed: bool,
    pub completed: bool,
    pub children: SmallVec<[AtomId; 4]>,
}

impl ResolvedAtom {
    pub fn new(node: NodeId, kind: AtomKind) -> Self {
        Self {
            node,
            kind,
            analyzed: true,
            completed: false,
            children: SmallVec::new(),
        }
    }

    pub fn as_lambda(&self) -> Option<&LambdaAtom> {
        match &self.kind {
            AtomKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AtomTree {
    atoms: Vec<ResolvedAtom>,
}

impl AtomTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, atom: ResolvedAtom) -> AtomId {
        let id = AtomId(self.atoms.len() as u32);
        self.atoms.push(atom);
        id
    }

    /// Append `child` to `parent`'s children. Unknown parents are ignored.
    pub fn add_child(&mut self, parent: AtomId, child: AtomId) {
        if let Some(atom) = self.get_mut(parent) {
            atom.children.push(child);
        }
    }

    pub fn get(&self, id: AtomId) -> Option<&ResolvedAtom> {
        self.atoms.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: AtomId) -> Option<&mut ResolvedAtom> {
        self.atoms.get_mut(id.0 as usize)
    }

    pub fn children(&self, id: AtomId) -> SmallVec<[AtomId; 4]> {
        self.get(id).map(|atom| atom.children.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AtomId, &ResolvedAtom)> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(i, atom)| (AtomId(i as u32), atom))
    }

    /// Follow wrapper lambdas (no result arguments, a single lambda child)
    /// down to the lambda that owns the body.
    pub fn unwrap_lambda(&self, id: AtomId) -> AtomId {
        let mut current = id;
        while let Some(atom) = self.get(current)
            && let Some(lambda) = atom.as_lambda()
            && lambda.result_arguments.is_none()
            && let [child] = atom.children.as_slice()
            && self.get(*child).and_then(ResolvedAtom::as_lambda).is_some()
        {
            current = *child;
        }
        current
    }
}

#[cfg(test)]
#[path = "../tests/atom_tests.rs"]
mod tests;
