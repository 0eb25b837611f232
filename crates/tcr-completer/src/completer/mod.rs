//! The completion pass.
//!
//! `AtomCompleter` walks one top-level expression's atom tree bottom-up and
//! finalizes every atom against the solved substitutor. The walk and the
//! dispatch by atom kind live here; each kind's work lives in its own module
//! as further `impl AtomCompleter` blocks:
//! - `transform`: finalized calls, receivers, substitution helpers
//! - `lambda`: functional types of lambdas and retyping of their returns
//! - `callable_reference`: synthesized calls for `::member` references
//! - `collection_literal`, `sub_call`: re-typing of argument expressions
//! - `expression`: the shared "update recorded type" step

mod callable_reference;
mod collection_literal;
mod expression;
mod lambda;
mod sub_call;
mod transform;

pub use lambda::{FunctionLiteralTypes, ProcessedType};

use crate::atom::{AtomId, AtomKind, AtomTree, CallAtom, CallSiteKind};
use crate::collaborators::CallCheckerContext;
use crate::context::CompletionContext;
use crate::error::CompletionError;
use crate::resolved_call::{ResolutionStatus, ResolvedCall};
use std::sync::Arc;
use tcr_common::Diagnostic;
use tcr_common::limits::{ATOM_TRAVERSAL_RED_ZONE, ATOM_TRAVERSAL_STACK_SIZE};
use tcr_solver::InferenceSubstitutor;
use tracing::{debug, trace};

pub struct AtomCompleter<'a> {
    ctx: CompletionContext<'a>,
    substitutor: &'a InferenceSubstitutor,
}

impl<'a> AtomCompleter<'a> {
    pub fn new(ctx: CompletionContext<'a>, substitutor: &'a InferenceSubstitutor) -> Self {
        Self { ctx, substitutor }
    }

    pub fn context(&self) -> &CompletionContext<'a> {
        &self.ctx
    }

    pub fn into_context(self) -> CompletionContext<'a> {
        self.ctx
    }

    /// Complete `atom` and everything below it, children first.
    ///
    /// Unanalyzed atoms are skipped together with their subtrees.
    pub fn complete_all(&mut self, tree: &mut AtomTree, atom: AtomId) -> Result<(), CompletionError> {
        stacker::maybe_grow(ATOM_TRAVERSAL_RED_ZONE, ATOM_TRAVERSAL_STACK_SIZE, || {
            self.complete_all_inner(tree, atom)
        })
    }

    fn complete_all_inner(&mut self, tree: &mut AtomTree, atom: AtomId) -> Result<(), CompletionError> {
        let Some(resolved) = tree.get(atom) else {
            return Ok(());
        };
        if !resolved.analyzed {
            trace!(atom = atom.0, node = %resolved.node, "skip: not analyzed");
            return Ok(());
        }
        for child in tree.children(atom) {
            self.complete_all(tree, child)?;
        }
        self.complete(tree, atom)
    }

    /// Complete the root of a top-level call and return its finalized call.
    ///
    /// `diagnostics` are reported together with the call's own. Non-call
    /// roots are completed the same way, report `diagnostics` as they are
    /// and yield `None`. The root call is finalized even when constraint
    /// collection left it unanalyzed.
    pub fn complete_top_level(
        &mut self,
        tree: &mut AtomTree,
        root: AtomId,
        diagnostics: Vec<Diagnostic>,
    ) -> Result<Option<Arc<ResolvedCall>>, CompletionError> {
        let Some(resolved) = tree.get(root) else {
            self.report(&merge_diagnostics([diagnostics]));
            return Ok(None);
        };
        if !matches!(resolved.kind, AtomKind::Call(_)) {
            self.complete_all(tree, root)?;
            self.report(&merge_diagnostics([diagnostics]));
            return Ok(None);
        }
        if let AtomKind::Call(call) = &resolved.kind
            && resolved.completed
        {
            self.ctx.partial_calls.mark_finalized(call.call.node);
        }
        for child in tree.children(root) {
            self.complete_all(tree, child)?;
        }
        let result = match tree.get(root).map(|atom| &atom.kind) {
            Some(AtomKind::Call(call)) => self.complete_resolved_call(call, diagnostics),
            _ => None,
        };
        if let Some(atom) = tree.get_mut(root) {
            atom.completed = true;
        }
        Ok(result)
    }

    fn complete(&mut self, tree: &mut AtomTree, atom: AtomId) -> Result<(), CompletionError> {
        let Some(resolved) = tree.get(atom) else {
            return Ok(());
        };
        if resolved.completed {
            trace!(atom = atom.0, "skip: already completed");
            return Ok(());
        }
        if self.ctx.collaborators.session.call_completed(resolved) {
            trace!(atom = atom.0, "skip: completed by inference session");
            return Ok(());
        }
        debug!(
            atom = atom.0,
            kind = resolved.kind.name(),
            node = %resolved.node,
            "complete"
        );

        let mut body = None;
        let completed = match &resolved.kind {
            AtomKind::CollectionLiteral(literal) => {
                self.complete_collection_literal(literal);
                true
            }
            AtomKind::CallableReference(reference) => self.complete_callable_reference(reference)?,
            AtomKind::Lambda(_) => {
                let unwrapped = tree.unwrap_lambda(atom);
                let already = unwrapped != atom && tree.get(unwrapped).is_some_and(|a| a.completed);
                if !already {
                    self.complete_lambda(tree, unwrapped)?;
                    body = Some(unwrapped);
                }
                true
            }
            AtomKind::Call(call) => {
                self.complete_resolved_call(call, Vec::new());
                true
            }
            AtomKind::SubCallArgument(argument) => {
                self.complete_sub_call_argument(argument);
                true
            }
        };

        if completed {
            for id in std::iter::once(atom).chain(body) {
                if let Some(resolved) = tree.get_mut(id) {
                    resolved.completed = true;
                }
            }
        }
        Ok(())
    }

    /// Finalize a call atom: merge its diagnostics, build the resolved call,
    /// bind it and run the checker pipeline.
    ///
    /// A call is finalized once per pass. Later calls return the bound call
    /// and report only diagnostics it does not already carry.
    /// Returns `None` only for variable-for-invoke placeholders.
    pub fn complete_resolved_call(
        &mut self,
        atom: &CallAtom,
        diagnostics: Vec<Diagnostic>,
    ) -> Option<Arc<ResolvedCall>> {
        let node = atom.call.node;
        let from_partial_call = self.ctx.partial_calls.take(node);

        if atom.call.kind == CallSiteKind::VariableForInvoke {
            trace!(node = %node, "skip: variable-for-invoke placeholder");
            return None;
        }

        if !self.ctx.partial_calls.mark_finalized(node) {
            trace!(node = %node, "already finalized");
            let bound = self.ctx.store.resolved_call(node);
            let late: Vec<Diagnostic> = merge_diagnostics([diagnostics, from_partial_call])
                .into_iter()
                .filter(|d| bound.as_ref().is_none_or(|call| !call.diagnostics.contains(d)))
                .collect();
            self.report(&late);
            return bound;
        }

        let mut all_diagnostics = merge_diagnostics([
            atom.diagnostics.clone(),
            diagnostics,
            from_partial_call,
        ]);
        let mut resolved = self.transform_to_resolved_call(atom);
        let checkers = self.ctx.collaborators.checkers;
        let top_level = CallCheckerContext {
            db: self.ctx.db,
            store: self.ctx.store,
            resolution: &self.ctx.call_context,
        };

        if resolved.is_error_candidate() {
            debug!(node = %atom.call.node, "error candidate: skipping call checkers");
            checkers.run_arguments_checks(&resolved, &top_level, &mut all_diagnostics);
            self.check_missing_receiver_supertypes(&resolved, &mut all_diagnostics);
            resolved.status = ResolutionStatus::Error;
            resolved.diagnostics = all_diagnostics;
            let resolved = Arc::new(resolved);
            self.ctx.store.record_resolved_call(node, Arc::clone(&resolved));
            self.report(&resolved.diagnostics);
            return Some(resolved);
        }

        let partial_context = self
            .ctx
            .store
            .partial_resolution_context(atom.call.resolution_context_key());
        let checker_context = match &partial_context {
            Some(context) => CallCheckerContext {
                db: self.ctx.db,
                store: self.ctx.store,
                resolution: context,
            },
            None => CallCheckerContext { ..top_level },
        };

        checkers.run_arguments_checks(&resolved, &top_level, &mut all_diagnostics);
        checkers.run_call_checkers(&resolved, &checker_context, &mut all_diagnostics);
        checkers.run_additional_receiver_checks(&resolved, &top_level, &mut all_diagnostics);

        resolved.status = if all_diagnostics.iter().any(Diagnostic::is_error) {
            ResolutionStatus::Error
        } else {
            ResolutionStatus::Success
        };
        resolved.diagnostics = all_diagnostics;
        let resolved = Arc::new(resolved);
        self.bind(&resolved);
        self.report(&resolved.diagnostics);
        Some(resolved)
    }
}

/// Concatenate diagnostic lists, dropping exact duplicates.
fn merge_diagnostics<const N: usize>(lists: [Vec<Diagnostic>; N]) -> Vec<Diagnostic> {
    let mut seen = rustc_hash::FxHashSet::default();
    let mut merged = Vec::new();
    for diagnostic in lists.into_iter().flatten() {
        if seen.insert(diagnostic.clone()) {
            merged.push(diagnostic);
        }
    }
    merged
}
