//! Services the completion pass consumes but does not own.
//!
//! Each is a trait so drivers and tests can plug in their own. The defaults
//! here do nothing beyond what the pass itself needs, except
//! `StandardCallCheckers`, which carries the two checks every driver wants.

use crate::atom::ResolvedAtom;
use crate::binding::{BindingStore, ExpressionTypeInfo};
use crate::context::ExpressionContext;
use crate::resolved_call::ResolvedCall;
use crate::candidate::DescriptorFlags;
use std::sync::Mutex;
use tcr_common::diagnostics::diagnostic_codes;
use tcr_common::{Diagnostic, NodeId};
use tcr_solver::TypeDatabase;

/// Outer inference driver (builder-style inference completes some calls
/// out of band).
pub trait InferenceSession: Send + Sync {
    /// Whether `atom` was already completed by the driver.
    fn call_completed(&self, atom: &ResolvedAtom) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultInferenceSession;

impl InferenceSession for DefaultInferenceSession {
    fn call_completed(&self, _atom: &ResolvedAtom) -> bool {
        false
    }
}

/// Re-types an expression node under a context.
pub trait ExpressionTypingServices: Send + Sync {
    fn get_type_info(
        &self,
        expression: NodeId,
        context: &ExpressionContext,
        store: &BindingStore,
    ) -> ExpressionTypeInfo;
}

/// Typing service that only knows what is already recorded.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordedTypes;

impl ExpressionTypingServices for RecordedTypes {
    fn get_type_info(
        &self,
        expression: NodeId,
        context: &ExpressionContext,
        store: &BindingStore,
    ) -> ExpressionTypeInfo {
        store.expression_type_info(expression).unwrap_or_else(|| {
            ExpressionTypeInfo::new(None, context.data_flow.clone())
        })
    }
}

/// What call checkers see besides the call itself.
pub struct CallCheckerContext<'a> {
    pub db: &'a dyn TypeDatabase,
    pub store: &'a BindingStore,
    pub resolution: &'a ExpressionContext,
}

/// Policy checks run on finalized calls. Every check appends to the call's
/// diagnostics; nothing is reported directly.
pub trait CallCheckers: Send + Sync {
    fn run_arguments_checks(
        &self,
        _call: &ResolvedCall,
        _context: &CallCheckerContext<'_>,
        _diagnostics: &mut Vec<Diagnostic>,
    ) {
    }

    fn run_call_checkers(
        &self,
        _call: &ResolvedCall,
        _context: &CallCheckerContext<'_>,
        _diagnostics: &mut Vec<Diagnostic>,
    ) {
    }

    fn run_additional_receiver_checks(
        &self,
        _call: &ResolvedCall,
        _context: &CallCheckerContext<'_>,
        _diagnostics: &mut Vec<Diagnostic>,
    ) {
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoCallCheckers;

impl CallCheckers for NoCallCheckers {}

/// Missing required arguments and use of deprecated callables.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCallCheckers;

impl CallCheckers for StandardCallCheckers {
    fn run_arguments_checks(
        &self,
        call: &ResolvedCall,
        context: &CallCheckerContext<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for (index, param) in call.candidate_descriptor.params.iter().enumerate() {
            if param.has_default || param.is_vararg || call.value_arguments.contains_key(&index) {
                continue;
            }
            let name = context.db.names().resolve(param.name);
            diagnostics.push(Diagnostic::from_code(
                call.call.call_element,
                diagnostic_codes::NO_VALUE_FOR_PARAMETER,
                &[&*name],
            ));
        }
    }

    fn run_call_checkers(
        &self,
        call: &ResolvedCall,
        context: &CallCheckerContext<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let descriptor = &call.candidate_descriptor;
        if descriptor.flags.contains(DescriptorFlags::DEPRECATED) {
            let name = context.db.names().resolve(descriptor.name);
            diagnostics.push(Diagnostic::from_code(
                call.call.callee,
                diagnostic_codes::DEPRECATION,
                &[&*name],
            ));
        }
    }
}

/// Receives finalized diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that keeps everything it receives, in order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }

    pub fn count_code(&self, code: u32) -> usize {
        self.diagnostics().iter().filter(|d| d.code == code).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }
}
