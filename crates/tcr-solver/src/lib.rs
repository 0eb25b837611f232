//! Type layer of the completion stage.
//!
//! The constraint solver that produces inference results lives upstream; this
//! crate only holds what completion needs to *consume* those results:
//!
//! - **Interning**: structural `TypeData` behind `TypeId` handles (O(1) equality)
//! - **Substitution**: `Substitutor` implementations for solved inference
//!   variables and for callable type parameters, plus chaining
//! - **Lattice**: subtype relation and common-supertype calculation
//! - **Approximation**: widening capture-only / local structure to types that
//!   are safe to expose outside their lexical scope
mod approximate;
mod class_hierarchy;
mod common_supertype;
mod format;
mod intern;
mod substitute;
mod subtype;
pub mod types;
pub mod visitor;

pub use approximate::{ApproximationConfig, TypeApproximator};
pub use class_hierarchy::ClassHierarchy;
pub use common_supertype::CommonSupertypeCalculator;
pub use format::TypeFormatter;
pub use intern::{TypeDatabase, TypeInterner};
pub use substitute::{
    ChainedSubstitutor, EmptySubstitutor, InferenceSubstitutor, SubstitutionKey, Substitutor,
    TypeInstantiator, TypeSubstitution,
};
pub use subtype::{SubtypeChecker, is_subtype_of};
pub use types::{
    ClassId, ClassInfo, FunctionShape, InferenceVar, IntrinsicKind, TypeData, TypeId, TypeList,
    TypeParamId, TypeParamInfo,
};
pub use visitor::{
    contains_error_type, contains_inference_variables, contains_stub_type, contains_type_matching,
    for_each_child,
};
