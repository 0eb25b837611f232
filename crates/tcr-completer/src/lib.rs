//! Completion of resolved call atoms.
//!
//! Once the constraint solver has a solution for every inference variable of
//! a top-level expression, this crate walks the tree of atoms constraint
//! collection produced and finalizes each one:
//!
//! - **Calls**: substituted signature and receivers, merged diagnostics,
//!   checker pipeline, binding into the shared store
//! - **Lambdas**: final functional type, unit coercion, retyping of return
//!   expressions
//! - **Callable references**: a synthesized call per reference, with
//!   argument adaptation recorded when it is not one-to-one
//! - **Collection literals / sub-call arguments**: retyping against the now
//!   known expected type
//!
//! The pass is driven by [`AtomCompleter`]; everything it consumes from the
//! rest of the compiler comes in through the traits in [`collaborators`].

pub mod atom;
pub mod binding;
pub mod candidate;
pub mod collaborators;
mod completer;
pub mod context;
mod error;
mod options;
pub mod resolved_call;

pub use atom::{
    AtomId, AtomKind, AtomTree, CallAtom, CallSite, CallSiteKind, CallableReferenceAtom,
    CollectionLiteralAtom, LambdaArgument, LambdaAtom, LambdaResultArgument, ResolvedAtom,
    ResultArgumentsInfo, SubCallArgumentAtom,
};
pub use binding::{BindingStore, ExpressionTypeInfo, FunctionSignature, VariableSignature};
pub use candidate::{
    CallArgument, CallableDescriptor, CallableReferenceAdaptation, CallableReferenceCandidate,
    Candidate, CoercionStrategy, DescriptorFlags, DescriptorKind, ExplicitReceiverKind,
    ReceiverKind, ReceiverValue, ResolvedCallArgument, Signature, SuspendConversionStrategy,
    ValueParameter,
};
pub use collaborators::{
    CallCheckerContext, CallCheckers, CollectingSink, DefaultInferenceSession, DiagnosticSink,
    ExpressionTypingServices, InferenceSession, NoCallCheckers, RecordedTypes,
    StandardCallCheckers,
};
pub use completer::{AtomCompleter, FunctionLiteralTypes, ProcessedType};
pub use context::{
    Collaborators, CompletionContext, ContextDependency, DataFlowInfo, ExpectedType,
    ExpressionContext, PartialCallContainer, PartialCallTable,
};
pub use error::CompletionError;
pub use options::CompletionOptions;
pub use resolved_call::{
    CallRecord, ResolutionStatus, ResolvedCall, ResolvedValueArgument, ValueArgument,
};
