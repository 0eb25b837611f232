//! Lambda completion.
//!
//! A lambda's functional type is known only once the outer call is solved.
//! Completion substitutes it, approximates what escapes the literal's scope,
//! writes the result back into the literal's signature, replaces the
//! provisional type of the literal expression and retypes every return
//! expression against the final return type.

use super::AtomCompleter;
use crate::atom::{AtomId, AtomTree, LambdaArgument, LambdaAtom};
use crate::binding::FunctionSignature;
use crate::context::ExpectedType;
use crate::error::CompletionError;
use std::sync::Arc;
use tcr_common::NodeId;
use tcr_solver::{
    CommonSupertypeCalculator, FunctionShape, TypeApproximator, TypeId,
    contains_error_type, contains_inference_variables,
};
use tracing::{debug, trace};

/// A type after substitution, and its approximation for declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessedType {
    pub substituted: TypeId,
    pub approximated: TypeId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionLiteralTypes {
    pub return_type: ProcessedType,
    pub parameters: Vec<ProcessedType>,
    pub receiver: Option<ProcessedType>,
}

impl AtomCompleter<'_> {
    /// Whether the lambda at `atom` is coerced to `Unit`.
    ///
    /// Wrapper lambdas inherit the answer from their single child lambda.
    pub fn is_coerced_to_unit(&self, tree: &AtomTree, atom: AtomId) -> Result<bool, CompletionError> {
        let Some(resolved) = tree.get(atom) else {
            return Ok(false);
        };
        let Some(lambda) = resolved.as_lambda() else {
            return Ok(false);
        };
        let Some(info) = &lambda.result_arguments else {
            return match resolved.children.as_slice() {
                [child] if tree.get(*child).and_then(|c| c.as_lambda()).is_some() => {
                    self.is_coerced_to_unit(tree, *child)
                }
                _ => Err(CompletionError::MissingResultArguments {
                    node: resolved.node,
                }),
            };
        };

        if info.non_error_arguments.is_empty() && !info.return_arguments_exist {
            return Ok(true);
        }
        let return_types: Vec<TypeId> = info
            .non_error_arguments
            .iter()
            .filter_map(|argument| argument.ty)
            .map(|ty| self.substitute(ty))
            .collect();
        if return_types.is_empty()
            || return_types
                .iter()
                .any(|&ty| contains_inference_variables(self.ctx.db, ty))
        {
            trace!(atom = atom.0, "unresolved return types: not coerced to Unit");
            return Ok(false);
        }
        let common = CommonSupertypeCalculator::new(self.ctx.db).common_supertype(&return_types);
        Ok(common == TypeId::UNIT)
    }

    /// Substitute a function literal's signature.
    ///
    /// Types fixed by the lambda atom win over the declared ones. Returns the
    /// processed types and a new signature with approximated types written
    /// back where the declared ones were still open.
    pub fn substitute_function_literal_descriptor(
        &self,
        lambda: Option<(&AtomTree, AtomId)>,
        descriptor: &FunctionSignature,
        function: NodeId,
    ) -> Result<(FunctionLiteralTypes, FunctionSignature), CompletionError> {
        let atom = lambda.and_then(|(tree, id)| tree.get(id)).and_then(|a| a.as_lambda());
        let coerced = match lambda {
            Some((tree, id)) if atom.is_some() => self.is_coerced_to_unit(tree, id)?,
            _ => false,
        };

        let inferred_return = if coerced {
            Some(TypeId::UNIT)
        } else {
            atom.and_then(|a| a.return_type)
        };
        let return_type = inferred_return
            .or(descriptor.return_type)
            .ok_or(CompletionError::MissingReturnType { node: function })?;
        let receiver_type = atom
            .and_then(|a| a.receiver)
            .or(descriptor.extension_receiver);
        let parameter_types: &[TypeId] = atom
            .and_then(|a| a.parameters.as_deref())
            .unwrap_or(&descriptor.params);

        let mut updated = descriptor.clone();

        let return_type = self.substitute_and_approximate(return_type);
        updated.return_type = Some(return_type.approximated);

        let receiver = receiver_type.map(|ty| self.substitute_and_approximate(ty));
        if let (Some(receiver), Some(declared)) = (receiver, descriptor.extension_receiver)
            && self.should_be_updated(declared)
        {
            updated.extension_receiver = Some(receiver.approximated);
        }

        if let Some(declared) = descriptor.dispatch_receiver
            && self.should_be_updated(declared)
        {
            updated.dispatch_receiver = Some(self.substitute_and_approximate(declared).approximated);
        }

        let mut parameters = Vec::with_capacity(descriptor.params.len());
        for (index, &declared) in descriptor.params.iter().enumerate() {
            let Some(&ty) = parameter_types.get(index) else {
                continue;
            };
            let processed = self.substitute_and_approximate(ty);
            if self.should_be_updated(declared) {
                updated.params[index] = processed.approximated;
            }
            parameters.push(processed);
        }

        let types = FunctionLiteralTypes {
            return_type,
            parameters,
            receiver,
        };
        Ok((types, updated))
    }

    fn substitute_and_approximate(&self, ty: TypeId) -> ProcessedType {
        let substituted = self.substitute(ty);
        ProcessedType {
            substituted,
            approximated: TypeApproximator::new(self.ctx.db)
                .approximate_declaration_type(substituted, true),
        }
    }

    /// Declared types still open after constraint collection get replaced.
    fn should_be_updated(&self, ty: TypeId) -> bool {
        contains_inference_variables(self.ctx.db, ty) || contains_error_type(self.ctx.db, ty)
    }

    /// Complete the body-owning lambda at `atom`.
    pub(crate) fn complete_lambda(&mut self, tree: &AtomTree, atom: AtomId) -> Result<(), CompletionError> {
        let Some(resolved) = tree.get(atom) else {
            return Ok(());
        };
        let Some(lambda) = resolved.as_lambda() else {
            return Ok(());
        };
        let info = lambda
            .result_arguments
            .as_ref()
            .ok_or(CompletionError::MissingResultArguments { node: resolved.node })?;

        let (expression, function, named_statement) = literal_nodes(lambda)?;
        let store = self.ctx.store;
        let descriptor = store
            .function(function)
            .ok_or(CompletionError::MissingFunctionDescriptor { node: function })?;

        let (types, updated) =
            self.substitute_function_literal_descriptor(Some((tree, atom)), &descriptor, function)?;
        store.record_function(function, Arc::new(updated));

        let Some(existing) = store.get_type(expression) else {
            if named_statement {
                trace!(node = %function, "named function statement: no expression type");
                return Ok(());
            }
            return Err(CompletionError::MissingLiteralType { node: expression });
        };

        let functional_type = self.ctx.db.function(FunctionShape {
            receiver: types.receiver.map(|r| r.substituted),
            params: types.parameters.iter().map(|p| p.substituted).collect(),
            return_type: types.return_type.substituted,
            is_suspend: lambda.is_suspend,
        });
        debug!(
            node = %expression,
            provisional = existing.0,
            functional_type = %self.format_type(functional_type),
            "lambda type"
        );
        store.record_type(expression, functional_type);

        let expected = ExpectedType::Type(types.return_type.approximated);
        for result in &info.non_error_arguments {
            let Some(result_expression) = result.expression else {
                continue;
            };
            let context = self
                .ctx
                .call_context
                .replace_data_flow(result.data_flow_after.clone())
                .replace_expected_type(expected);
            self.update_recorded_type(result_expression, &context);
        }
        Ok(())
    }
}

/// (expression, function, is a named function statement)
fn literal_nodes(lambda: &LambdaAtom) -> Result<(NodeId, NodeId, bool), CompletionError> {
    match lambda.argument {
        LambdaArgument::Literal {
            expression,
            function,
        } => Ok((expression, function, false)),
        LambdaArgument::AnonymousFunction { function, named } => Ok((function, function, named)),
        LambdaArgument::Other { node } => Err(CompletionError::UnexpectedLambdaArgument { node }),
    }
}
