//! Finalized calls: what the completion pass hands to the rest of the
//! compiler.

use crate::candidate::{
    CallableDescriptor, ExplicitReceiverKind, ReceiverValue, Signature,
};
use indexmap::IndexMap;
use std::sync::Arc;
use tcr_common::{Diagnostic, NodeId};
use tcr_solver::TypeId;

/// An argument of a finalized call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueArgument {
    Expression(NodeId),
    /// Synthesized positional argument of a callable reference's fake call.
    FakePositional { call_element: NodeId, index: usize },
    /// A single fake argument passed to a vararg parameter as a spread.
    FakeImplicitSpread { call_element: NodeId, index: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedValueArgument {
    Default,
    Expression(ValueArgument),
    Vararg(Vec<ValueArgument>),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResolutionStatus {
    #[default]
    Unknown,
    Success,
    Error,
}

/// The call as written (or synthesized) at a surface location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRecord {
    pub call_element: NodeId,
    pub callee: NodeId,
    pub explicit_receiver: Option<ReceiverValue>,
    pub value_arguments: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ResolvedCall {
    pub call: CallRecord,
    pub candidate_descriptor: Arc<CallableDescriptor>,
    /// The candidate's signature after substitution and approximation.
    pub resulting_descriptor: Signature,
    pub dispatch_receiver: Option<ReceiverValue>,
    pub extension_receiver: Option<ReceiverValue>,
    pub explicit_receiver_kind: ExplicitReceiverKind,
    pub type_arguments: Vec<TypeId>,
    /// Parameter index -> recorded argument.
    pub value_arguments: IndexMap<usize, ResolvedValueArgument>,
    pub status: ResolutionStatus,
    pub completed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedCall {
    pub fn new(
        call: CallRecord,
        descriptor: Arc<CallableDescriptor>,
        dispatch_receiver: Option<ReceiverValue>,
        extension_receiver: Option<ReceiverValue>,
        explicit_receiver_kind: ExplicitReceiverKind,
    ) -> Self {
        let resulting_descriptor = descriptor.signature();
        Self {
            call,
            candidate_descriptor: descriptor,
            resulting_descriptor,
            dispatch_receiver,
            extension_receiver,
            explicit_receiver_kind,
            type_arguments: Vec::new(),
            value_arguments: IndexMap::new(),
            status: ResolutionStatus::Unknown,
            completed: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn record_value_argument(&mut self, parameter: usize, argument: ResolvedValueArgument) {
        self.value_arguments.insert(parameter, argument);
    }

    pub fn value_argument(&self, parameter: usize) -> Option<&ResolvedValueArgument> {
        self.value_arguments.get(&parameter)
    }

    pub fn set_status_to_success(&mut self) {
        self.status = ResolutionStatus::Success;
    }

    pub fn mark_call_as_completed(&mut self) {
        self.completed = true;
    }

    pub fn is_error_candidate(&self) -> bool {
        self.candidate_descriptor.is_error()
    }

    pub fn return_type(&self) -> TypeId {
        self.resulting_descriptor.return_type
    }
}
