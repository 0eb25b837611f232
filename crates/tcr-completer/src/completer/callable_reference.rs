//! Callable-reference completion.
//!
//! A `::member` reference is resolved like a call, so it is finalized into a
//! synthesized zero-argument call at the reference's location. How the
//! member's parameters map onto the expected function type (defaults,
//! vararg grouping, coercions) is recorded on that call only when the
//! mapping is not one-to-one.

use super::AtomCompleter;
use crate::atom::CallableReferenceAtom;
use crate::binding::{ExpressionTypeInfo, FunctionSignature, VariableSignature};
use crate::candidate::{
    CallArgument, CallableDescriptor, CallableReferenceAdaptation, CallableReferenceCandidate,
    CoercionStrategy, DescriptorFlags, ReceiverValue, ResolvedCallArgument,
    SuspendConversionStrategy,
};
use crate::collaborators::CallCheckerContext;
use crate::error::CompletionError;
use crate::resolved_call::{CallRecord, ResolvedCall, ResolvedValueArgument, ValueArgument};
use std::sync::Arc;
use tcr_common::diagnostics::diagnostic_codes;
use tcr_common::{Diagnostic, NodeId};
use tcr_solver::{
    ApproximationConfig, TypeApproximator, TypeData, TypeId, TypeSubstitution,
    contains_stub_type,
};
use tracing::{debug, trace};

/// How the reference's declared types are substituted.
enum ReferenceSubstitution {
    /// The member is used as declared.
    Empty,
    /// The member's type parameters, then the solved substitutor.
    Chained(TypeSubstitution),
}

/// Finalized receivers and type of a reference.
struct ResultTypeInfo {
    dispatch_receiver: Option<ReceiverValue>,
    extension_receiver: Option<ReceiverValue>,
    explicit_receiver: Option<ReceiverValue>,
    substitution: ReferenceSubstitution,
    result_type: TypeId,
}

/// Declaration bound to the reference expression by an earlier resolution.
enum RecordedDescriptor {
    Function(Arc<FunctionSignature>),
    Variable(Arc<VariableSignature>),
}

impl RecordedDescriptor {
    fn receivers(&self) -> (Option<TypeId>, Option<TypeId>) {
        match self {
            RecordedDescriptor::Function(f) => (f.dispatch_receiver, f.extension_receiver),
            RecordedDescriptor::Variable(v) => (v.dispatch_receiver, v.extension_receiver),
        }
    }
}

impl AtomCompleter<'_> {
    /// Returns false when the reference was left incomplete.
    pub(crate) fn complete_callable_reference(
        &mut self,
        atom: &CallableReferenceAtom,
    ) -> Result<bool, CompletionError> {
        let Some(candidate) = &atom.candidate else {
            debug!(node = %atom.expression, "callable reference without candidate");
            return Ok(false);
        };
        let store = self.ctx.store;
        let expression = atom.expression;

        let recorded = if candidate.descriptor.is_function_like() {
            store.function(expression).map(RecordedDescriptor::Function)
        } else if candidate.descriptor.is_property() {
            store.variable(expression).map(RecordedDescriptor::Variable)
        } else {
            None
        };

        if let Some(receiver) = candidate.extension_receiver
            && contains_stub_type(self.ctx.db, receiver.ty)
        {
            debug!(node = %expression, "postponed variable in receiver type");
            let code = diagnostic_codes::TYPE_INFERENCE_POSTPONED_VARIABLE_IN_RECEIVER_TYPE;
            if store.claim_report_once(expression, code) {
                let ty = self.format_type(receiver.ty);
                self.ctx
                    .collaborators
                    .sink
                    .report(Diagnostic::from_code(expression, code, &[ty.as_str()]));
            }
            return Ok(false);
        }

        let info = match recorded {
            Some(recorded) => self.extract_result_type_info_from_descriptor(candidate, &recorded),
            None => self.update_callable_reference_result_type(candidate, expression),
        };

        let call = CallRecord {
            call_element: atom.callee,
            callee: atom.callee,
            explicit_receiver: info.explicit_receiver,
            value_arguments: Vec::new(),
        };
        let mut resolved = ResolvedCall::new(
            call,
            Arc::clone(&candidate.descriptor),
            info.dispatch_receiver,
            info.extension_receiver,
            candidate.explicit_receiver_kind,
        );
        resolved.resulting_descriptor = candidate
            .descriptor
            .signature()
            .map_types(|ty| self.approximate(self.apply_reference_substitution(&info.substitution, ty)));
        resolved.type_arguments = candidate
            .fresh_variables
            .iter()
            .map(|&var| self.substitute(self.ctx.db.variable(var)))
            .collect();

        if let Some(adaptation) = &candidate.adaptation {
            self.record_argument_adaptation(&mut resolved, adaptation)?;
        }
        resolved.set_status_to_success();
        resolved.mark_call_as_completed();

        let mut diagnostics = Vec::new();
        let checker_context = CallCheckerContext {
            db: self.ctx.db,
            store,
            resolution: &self.ctx.call_context,
        };
        self.ctx
            .collaborators
            .checkers
            .run_call_checkers(&resolved, &checker_context, &mut diagnostics);
        resolved.diagnostics = diagnostics;

        let resolved = Arc::new(resolved);
        self.bind(&resolved);
        store.record_expression_type_info(
            expression,
            ExpressionTypeInfo::new(Some(info.result_type), atom.data_flow_after.clone()),
        );
        store.mark_processed(expression);
        self.report(&resolved.diagnostics);
        Ok(true)
    }

    fn apply_reference_substitution(&self, substitution: &ReferenceSubstitution, ty: TypeId) -> TypeId {
        match substitution {
            ReferenceSubstitution::Empty => ty,
            ReferenceSubstitution::Chained(type_parameters) => {
                self.substitute_declared(type_parameters, ty)
            }
        }
    }

    fn extract_result_type_info_from_descriptor(
        &self,
        candidate: &CallableReferenceCandidate,
        recorded: &RecordedDescriptor,
    ) -> ResultTypeInfo {
        trace!("callable reference: using recorded descriptor");
        let (dispatch, extension) = recorded.receivers();
        ResultTypeInfo {
            dispatch_receiver: dispatch.map(ReceiverValue::implicit),
            extension_receiver: extension.map(ReceiverValue::implicit),
            explicit_receiver: candidate
                .explicit_receiver_kind
                .select(candidate.dispatch_receiver, candidate.extension_receiver),
            substitution: ReferenceSubstitution::Empty,
            result_type: candidate.reflection_type,
        }
    }

    fn update_callable_reference_result_type(
        &self,
        candidate: &CallableReferenceCandidate,
        expression: NodeId,
    ) -> ResultTypeInfo {
        let descriptor = &candidate.descriptor;
        let type_arguments: Vec<TypeId> = candidate
            .fresh_variables
            .iter()
            .map(|&var| self.substitute(self.ctx.db.variable(var)))
            .collect();
        let substitution = if descriptor.is_supported_for_callable_reference() {
            ReferenceSubstitution::Chained(TypeSubstitution::from_args(
                &descriptor.type_params,
                &type_arguments,
            ))
        } else {
            ReferenceSubstitution::Empty
        };

        let result_type = self.apply_reference_substitution(&substitution, candidate.reflection_type);
        let approximator = TypeApproximator::new(self.ctx.db);
        let result_type = if approximator.is_denotable(result_type) {
            result_type
        } else {
            let approximated = approximator
                .approximate_to_supertype(result_type, ApproximationConfig::FINAL)
                .unwrap_or(result_type);
            self.ctx.store.record_type(expression, approximated);
            approximated
        };

        let substitute = |ty| self.apply_reference_substitution(&substitution, ty);
        let dispatch_receiver = candidate
            .dispatch_receiver
            .map(|r| self.update_receiver_value(r, substitute));
        let extension_receiver = candidate
            .extension_receiver
            .map(|r| self.update_receiver_value(r, substitute));

        if descriptor.is_function_like() {
            self.bind_function_reference(expression, result_type, descriptor);
        } else if descriptor.is_property() {
            self.bind_property_reference(expression, result_type);
        }
        self.check_reference_is_to_allowed_member(descriptor, expression);

        let explicit_receiver = candidate
            .explicit_receiver_kind
            .select(candidate.dispatch_receiver, candidate.extension_receiver)
            .map(|r| self.update_receiver_value(r, substitute));

        ResultTypeInfo {
            dispatch_receiver,
            extension_receiver,
            explicit_receiver,
            substitution,
            result_type,
        }
    }

    fn bind_function_reference(
        &self,
        expression: NodeId,
        result_type: TypeId,
        descriptor: &CallableDescriptor,
    ) {
        let signature = match self.ctx.db.lookup(result_type) {
            Some(TypeData::Function(shape)) => FunctionSignature {
                dispatch_receiver: None,
                extension_receiver: shape.receiver,
                params: shape.params.to_vec(),
                return_type: Some(shape.return_type),
                is_suspend: shape.is_suspend,
            },
            _ => FunctionSignature {
                dispatch_receiver: None,
                extension_receiver: None,
                params: descriptor.params.iter().map(|p| p.ty).collect(),
                return_type: Some(descriptor.return_type),
                is_suspend: descriptor.flags.contains(DescriptorFlags::SUSPEND),
            },
        };
        self.ctx.store.record_function(expression, Arc::new(signature));
    }

    fn bind_property_reference(&self, expression: NodeId, result_type: TypeId) {
        self.ctx.store.record_variable(
            expression,
            Arc::new(VariableSignature {
                dispatch_receiver: None,
                extension_receiver: None,
                ty: result_type,
            }),
        );
    }

    /// Constructors of abstract and annotation classes cannot be referenced.
    fn check_reference_is_to_allowed_member(&self, descriptor: &CallableDescriptor, expression: NodeId) {
        let code = if descriptor.flags.contains(DescriptorFlags::ABSTRACT_CONSTRUCTOR) {
            diagnostic_codes::CALLABLE_REFERENCE_TO_ABSTRACT_CLASS_CONSTRUCTOR
        } else if descriptor.flags.contains(DescriptorFlags::ANNOTATION_CONSTRUCTOR) {
            diagnostic_codes::CALLABLE_REFERENCE_TO_ANNOTATION_CONSTRUCTOR
        } else {
            return;
        };
        let name = self.ctx.db.names().resolve(descriptor.name);
        self.ctx
            .collaborators
            .sink
            .report(Diagnostic::from_code(expression, code, &[&*name]));
    }

    /// Record the adaptation's arguments on `call` if the mapping is not
    /// one-to-one or the reference needs an implicit conversion. Either all
    /// mapped parameters are recorded or none.
    fn record_argument_adaptation(
        &self,
        call: &mut ResolvedCall,
        adaptation: &CallableReferenceAdaptation,
    ) -> Result<(), CompletionError> {
        let call_element = call.call.call_element;
        // The transient receiver of `Type::member` takes position 0.
        let is_unbound = call.dispatch_receiver.is_some_and(|r| r.is_transient());
        let fake_index = |parameter: usize, argument: &CallArgument| match *argument {
            CallArgument::FakeForCallableReference { index } => {
                Ok(if is_unbound { index + 1 } else { index })
            }
            CallArgument::Expression { .. } => {
                Err(CompletionError::UnexpectedCallableReferenceArgument { parameter })
            }
        };

        let mut has_non_trivial_mapping = false;
        let mut mapped = Vec::with_capacity(adaptation.mapped_arguments.len());
        for (&parameter, argument) in &adaptation.mapped_arguments {
            let value = match argument {
                ResolvedCallArgument::Default => {
                    has_non_trivial_mapping = true;
                    ResolvedValueArgument::Default
                }
                ResolvedCallArgument::Simple(argument) => {
                    let index = fake_index(parameter, argument)?;
                    let is_vararg = call
                        .candidate_descriptor
                        .params
                        .get(parameter)
                        .is_some_and(|p| p.is_vararg);
                    if is_vararg {
                        ResolvedValueArgument::Vararg(vec![ValueArgument::FakeImplicitSpread {
                            call_element,
                            index,
                        }])
                    } else {
                        ResolvedValueArgument::Expression(ValueArgument::FakePositional {
                            call_element,
                            index,
                        })
                    }
                }
                ResolvedCallArgument::Vararg(arguments) => {
                    has_non_trivial_mapping = true;
                    let elements = arguments
                        .iter()
                        .map(|argument| {
                            fake_index(parameter, argument).map(|index| {
                                ValueArgument::FakePositional {
                                    call_element,
                                    index,
                                }
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    ResolvedValueArgument::Vararg(elements)
                }
            };
            mapped.push((parameter, value));
        }

        if !has_non_trivial_mapping && !self.has_implicit_conversion(call, adaptation) {
            trace!(node = %call_element, "trivial adaptation not recorded");
            return Ok(());
        }
        debug!(node = %call_element, arguments = mapped.len(), "recording argument adaptation");
        for (parameter, value) in mapped {
            call.record_value_argument(parameter, value);
        }
        Ok(())
    }

    fn has_implicit_conversion(
        &self,
        call: &ResolvedCall,
        adaptation: &CallableReferenceAdaptation,
    ) -> bool {
        (adaptation.coercion == CoercionStrategy::CoercionToUnit && call.return_type() != TypeId::UNIT)
            || adaptation.suspend_conversion == SuspendConversionStrategy::SuspendConversion
    }
}
