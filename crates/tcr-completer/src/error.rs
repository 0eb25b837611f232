//! Fatal completion failures.
//!
//! Everything recoverable is reported as a `Diagnostic`. A `CompletionError`
//! means constraint collection handed over an atom tree that breaks one of
//! its own invariants, and the completion of the current top-level
//! expression is abandoned.

use tcr_common::NodeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("no type recorded for resolved lambda argument at node {node}")]
    MissingLiteralType { node: NodeId },

    #[error("no function descriptor for resolved lambda argument at node {node}")]
    MissingFunctionDescriptor { node: NodeId },

    #[error("unexpected argument shape for resolved lambda atom at node {node}")]
    UnexpectedLambdaArgument { node: NodeId },

    #[error("fake callable-reference argument expected for parameter #{parameter}")]
    UnexpectedCallableReferenceArgument { parameter: usize },

    #[error("lambda atom at node {node} carries no result arguments")]
    MissingResultArguments { node: NodeId },

    #[error("no return type for function literal at node {node}")]
    MissingReturnType { node: NodeId },
}

impl CompletionError {
    /// Surface node the broken invariant was detected on, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            CompletionError::MissingLiteralType { node }
            | CompletionError::MissingFunctionDescriptor { node }
            | CompletionError::UnexpectedLambdaArgument { node }
            | CompletionError::MissingResultArguments { node }
            | CompletionError::MissingReturnType { node } => Some(*node),
            CompletionError::UnexpectedCallableReferenceArgument { .. } => None,
        }
    }
}
