//! The shared output store.
//!
//! Completion writes every finalized call and type into a `BindingStore`
//! keyed by surface node. One store serves a whole compilation unit, and
//! independent top-level expressions may be completed on different threads,
//! so every slice is a `DashMap` and all writes go through `&self`.

use crate::candidate::CallableDescriptor;
use crate::context::{DataFlowInfo, ExpressionContext};
use crate::resolved_call::{CallRecord, ResolvedCall};
use dashmap::{DashMap, DashSet};
use std::sync::Arc;
use tcr_common::NodeId;
use tcr_solver::TypeId;
use tracing::trace;

/// Type of an expression together with the data flow after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionTypeInfo {
    pub ty: Option<TypeId>,
    pub data_flow: DataFlowInfo,
}

impl ExpressionTypeInfo {
    pub fn new(ty: Option<TypeId>, data_flow: DataFlowInfo) -> Self {
        Self { ty, data_flow }
    }
}

/// Signature of a local function: a lambda, an anonymous function, or the
/// synthetic function behind a function reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionSignature {
    pub dispatch_receiver: Option<TypeId>,
    pub extension_receiver: Option<TypeId>,
    pub params: Vec<TypeId>,
    /// `None` until something fixes it (unannotated lambdas).
    pub return_type: Option<TypeId>,
    pub is_suspend: bool,
}

/// Signature of the synthetic variable behind a property reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableSignature {
    pub dispatch_receiver: Option<TypeId>,
    pub extension_receiver: Option<TypeId>,
    pub ty: TypeId,
}

#[derive(Default)]
pub struct BindingStore {
    resolved_calls: DashMap<NodeId, Arc<ResolvedCall>>,
    calls: DashMap<NodeId, CallRecord>,
    references: DashMap<NodeId, Arc<CallableDescriptor>>,
    expression_types: DashMap<NodeId, ExpressionTypeInfo>,
    expected_types: DashMap<NodeId, TypeId>,
    functions: DashMap<NodeId, Arc<FunctionSignature>>,
    variables: DashMap<NodeId, Arc<VariableSignature>>,
    processed: DashSet<NodeId>,
    partial_resolution_contexts: DashMap<NodeId, ExpressionContext>,
    reported_once: DashSet<(NodeId, u32)>,
}

impl BindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Calls
    // =========================================================================

    pub fn record_resolved_call(&self, node: NodeId, call: Arc<ResolvedCall>) {
        trace!(node = %node, "BindingStore::record_resolved_call");
        self.resolved_calls.insert(node, call);
    }

    pub fn resolved_call(&self, node: NodeId) -> Option<Arc<ResolvedCall>> {
        self.resolved_calls.get(&node).map(|r| Arc::clone(r.value()))
    }

    pub fn record_call(&self, node: NodeId, call: CallRecord) {
        self.calls.insert(node, call);
    }

    pub fn call(&self, node: NodeId) -> Option<CallRecord> {
        self.calls.get(&node).map(|r| r.clone())
    }

    pub fn record_reference(&self, node: NodeId, target: Arc<CallableDescriptor>) {
        self.references.insert(node, target);
    }

    pub fn reference(&self, node: NodeId) -> Option<Arc<CallableDescriptor>> {
        self.references.get(&node).map(|r| Arc::clone(r.value()))
    }

    /// Per-call resolution context stored by constraint collection.
    pub fn record_partial_resolution_context(&self, call: NodeId, context: ExpressionContext) {
        self.partial_resolution_contexts.insert(call, context);
    }

    pub fn partial_resolution_context(&self, call: NodeId) -> Option<ExpressionContext> {
        self.partial_resolution_contexts.get(&call).map(|r| r.clone())
    }

    // =========================================================================
    // Expression types
    // =========================================================================

    pub fn record_expression_type_info(&self, node: NodeId, info: ExpressionTypeInfo) {
        trace!(node = %node, ty = ?info.ty, "BindingStore::record_expression_type_info");
        self.expression_types.insert(node, info);
    }

    pub fn expression_type_info(&self, node: NodeId) -> Option<ExpressionTypeInfo> {
        self.expression_types.get(&node).map(|r| r.clone())
    }

    /// Replace the type of `node`, keeping its recorded data flow.
    pub fn record_type(&self, node: NodeId, ty: TypeId) {
        trace!(node = %node, ty = ty.0, "BindingStore::record_type");
        self.expression_types.entry(node).or_default().ty = Some(ty);
    }

    pub fn get_type(&self, node: NodeId) -> Option<TypeId> {
        self.expression_types.get(&node).and_then(|r| r.ty)
    }

    pub fn record_expected_type(&self, node: NodeId, ty: TypeId) {
        self.expected_types.insert(node, ty);
    }

    pub fn expected_type(&self, node: NodeId) -> Option<TypeId> {
        self.expected_types.get(&node).map(|r| *r)
    }

    // =========================================================================
    // Local declarations
    // =========================================================================

    pub fn record_function(&self, node: NodeId, signature: Arc<FunctionSignature>) {
        self.functions.insert(node, signature);
    }

    pub fn function(&self, node: NodeId) -> Option<Arc<FunctionSignature>> {
        self.functions.get(&node).map(|r| Arc::clone(r.value()))
    }

    pub fn record_variable(&self, node: NodeId, signature: Arc<VariableSignature>) {
        self.variables.insert(node, signature);
    }

    pub fn variable(&self, node: NodeId) -> Option<Arc<VariableSignature>> {
        self.variables.get(&node).map(|r| Arc::clone(r.value()))
    }

    // =========================================================================
    // Bookkeeping
    // =========================================================================

    pub fn mark_processed(&self, node: NodeId) {
        self.processed.insert(node);
    }

    pub fn is_processed(&self, node: NodeId) -> bool {
        self.processed.contains(&node)
    }

    /// Returns true the first time a diagnostic `code` is claimed for `node`.
    pub fn claim_report_once(&self, node: NodeId, code: u32) -> bool {
        self.reported_once.insert((node, code))
    }

    pub fn resolved_call_count(&self) -> usize {
        self.resolved_calls.len()
    }
}

#[cfg(test)]
#[path = "../tests/binding_tests.rs"]
mod tests;
