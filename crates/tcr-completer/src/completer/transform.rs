//! Building finalized calls from candidates.

use super::AtomCompleter;
use crate::atom::CallAtom;
use crate::candidate::{CallArgument, ReceiverValue, ResolvedCallArgument};
use crate::resolved_call::{CallRecord, ResolvedCall, ResolvedValueArgument, ValueArgument};
use std::sync::Arc;
use tcr_common::Diagnostic;
use tcr_common::diagnostics::diagnostic_codes;
use tcr_solver::{
    ApproximationConfig, ClassHierarchy, Substitutor, TypeApproximator,
    TypeFormatter, TypeId, TypeInstantiator, TypeSubstitution,
};

impl AtomCompleter<'_> {
    /// Apply the solved substitutor to `ty`.
    pub(crate) fn substitute(&self, ty: TypeId) -> TypeId {
        self.substitute_with(self.substitutor, ty)
    }

    pub(crate) fn substitute_with<S: Substitutor + ?Sized>(&self, substitutor: &S, ty: TypeId) -> TypeId {
        if substitutor.is_empty() {
            return ty;
        }
        TypeInstantiator::new(self.ctx.db, substitutor)
            .with_max_depth(self.ctx.options.max_substitution_depth)
            .instantiate(ty)
            .unwrap_or(ty)
    }

    /// Substitute the callable's type parameters by `type_arguments`, then
    /// the solved substitutor.
    pub(crate) fn substitute_declared(
        &self,
        type_parameters: &TypeSubstitution,
        ty: TypeId,
    ) -> TypeId {
        let ty = self.substitute_with(type_parameters, ty);
        self.substitute(ty)
    }

    /// Final approximation after resolution and inference.
    pub(crate) fn approximate(&self, ty: TypeId) -> TypeId {
        TypeApproximator::new(self.ctx.db)
            .approximate_to_supertype(ty, ApproximationConfig::FINAL)
            .unwrap_or(ty)
    }

    /// Receiver with its type substituted and approximated; unchanged
    /// receivers are returned as is.
    pub(crate) fn update_receiver_value(
        &self,
        receiver: ReceiverValue,
        substitute: impl Fn(TypeId) -> TypeId,
    ) -> ReceiverValue {
        let new_type = self.approximate(substitute(receiver.ty));
        if new_type != receiver.ty {
            receiver.replace_type(new_type)
        } else {
            receiver
        }
    }

    pub(crate) fn format_type(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.ctx.db).format(ty)
    }

    pub(crate) fn transform_to_resolved_call(&self, atom: &CallAtom) -> ResolvedCall {
        let candidate = &atom.candidate;
        let descriptor = &candidate.descriptor;

        let type_arguments: Vec<TypeId> = candidate
            .fresh_variables
            .iter()
            .map(|&var| self.substitute(self.ctx.db.variable(var)))
            .collect();
        let type_parameters = TypeSubstitution::from_args(&descriptor.type_params, &type_arguments);
        let substitute = |ty| self.substitute_declared(&type_parameters, ty);

        let dispatch_receiver = candidate
            .dispatch_receiver
            .map(|r| self.update_receiver_value(r, substitute));
        let extension_receiver = candidate
            .extension_receiver
            .map(|r| self.update_receiver_value(r, substitute));
        let explicit_receiver = atom
            .call
            .explicit_receiver
            .map(|r| self.update_receiver_value(r, substitute));

        let call = CallRecord {
            call_element: atom.call.node,
            callee: atom.call.callee,
            explicit_receiver,
            value_arguments: atom.call.value_arguments.clone(),
        };
        let mut resolved = ResolvedCall::new(
            call,
            Arc::clone(descriptor),
            dispatch_receiver,
            extension_receiver,
            candidate.explicit_receiver_kind,
        );
        resolved.resulting_descriptor = descriptor
            .signature()
            .map_types(|ty| self.approximate(substitute(ty)));
        resolved.type_arguments = type_arguments;

        for (&parameter, argument) in &candidate.argument_mapping {
            let value = match argument {
                ResolvedCallArgument::Default => ResolvedValueArgument::Default,
                ResolvedCallArgument::Simple(argument) => {
                    ResolvedValueArgument::Expression(self.value_argument(atom, *argument))
                }
                ResolvedCallArgument::Vararg(arguments) => ResolvedValueArgument::Vararg(
                    arguments
                        .iter()
                        .map(|&argument| self.value_argument(atom, argument))
                        .collect(),
                ),
            };
            resolved.record_value_argument(parameter, value);
        }
        resolved.mark_call_as_completed();
        resolved
    }

    fn value_argument(&self, atom: &CallAtom, argument: CallArgument) -> ValueArgument {
        match argument {
            CallArgument::Expression { node } => ValueArgument::Expression(node),
            CallArgument::FakeForCallableReference { index } => ValueArgument::FakePositional {
                call_element: atom.call.node,
                index,
            },
        }
    }

    /// Report classes missing from the class table among the supertypes of
    /// the call's receiver.
    pub(crate) fn check_missing_receiver_supertypes(
        &self,
        call: &ResolvedCall,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if !self.ctx.options.check_missing_supertypes {
            return;
        }
        let Some(receiver) = call.dispatch_receiver.or(call.extension_receiver) else {
            return;
        };
        for name in ClassHierarchy::new(self.ctx.db).missing_supertypes(receiver.ty) {
            let name = self.ctx.db.names().resolve(name);
            diagnostics.push(Diagnostic::from_code(
                call.call.call_element,
                diagnostic_codes::MISSING_DEPENDENCY_SUPERCLASS,
                &[&*name],
            ));
        }
    }

    pub(crate) fn bind(&self, call: &Arc<ResolvedCall>) {
        let store = self.ctx.store;
        store.record_call(call.call.call_element, call.call.clone());
        if !call.call.callee.is_none() {
            store.record_reference(call.call.callee, Arc::clone(&call.candidate_descriptor));
        }
        store.record_resolved_call(call.call.call_element, Arc::clone(call));
    }

    pub(crate) fn report(&self, diagnostics: &[Diagnostic]) {
        let sink = self.ctx.collaborators.sink;
        for diagnostic in diagnostics {
            sink.report(diagnostic.clone());
        }
    }
}
