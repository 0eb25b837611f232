//! The candidate model: what overload resolution chose for a call site or a
//! callable reference, before substitution.

use bitflags::bitflags;
use indexmap::IndexMap;
use std::sync::Arc;
use tcr_common::{Atom, NodeId};
use tcr_solver::{InferenceVar, TypeId, TypeParamId};

bitflags! {
    /// Properties of a callable that checkers and the reference completer consult.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DescriptorFlags: u16 {
        /// Constructor of an abstract class.
        const ABSTRACT_CONSTRUCTOR = 1 << 0;
        /// Constructor of an annotation class.
        const ANNOTATION_CONSTRUCTOR = 1 << 1;
        const SUSPEND = 1 << 2;
        const OPERATOR = 1 << 3;
        const DEPRECATED = 1 << 4;
        /// Compiler-synthesized member; not addressable by `::name`.
        const SYNTHETIC = 1 << 5;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Function,
    Constructor,
    Property,
    /// Unresolved symbol; the candidate of a call that failed to resolve.
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueParameter {
    pub name: Atom,
    /// Declared type; for a vararg parameter, the element type.
    pub ty: TypeId,
    pub has_default: bool,
    pub is_vararg: bool,
}

impl ValueParameter {
    pub fn new(name: Atom, ty: TypeId) -> Self {
        Self {
            name,
            ty,
            has_default: false,
            is_vararg: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn vararg(mut self) -> Self {
        self.is_vararg = true;
        self
    }
}

/// Declaration of a function, constructor or property, as written: types may
/// mention the callable's own type parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallableDescriptor {
    pub name: Atom,
    pub kind: DescriptorKind,
    pub flags: DescriptorFlags,
    pub type_params: Vec<TypeParamId>,
    pub dispatch_receiver: Option<TypeId>,
    pub extension_receiver: Option<TypeId>,
    pub params: Vec<ValueParameter>,
    /// Return type of a function; the property type of a property.
    pub return_type: TypeId,
}

impl CallableDescriptor {
    fn with_kind(kind: DescriptorKind, name: Atom, return_type: TypeId) -> Self {
        Self {
            name,
            kind,
            flags: DescriptorFlags::empty(),
            type_params: Vec::new(),
            dispatch_receiver: None,
            extension_receiver: None,
            params: Vec::new(),
            return_type,
        }
    }

    pub fn function(name: Atom, params: Vec<ValueParameter>, return_type: TypeId) -> Self {
        Self {
            params,
            ..Self::with_kind(DescriptorKind::Function, name, return_type)
        }
    }

    pub fn constructor(name: Atom, params: Vec<ValueParameter>, class_type: TypeId) -> Self {
        Self {
            params,
            ..Self::with_kind(DescriptorKind::Constructor, name, class_type)
        }
    }

    pub fn property(name: Atom, ty: TypeId) -> Self {
        Self::with_kind(DescriptorKind::Property, name, ty)
    }

    /// Placeholder descriptor for an unresolved reference.
    pub fn error(name: Atom) -> Self {
        Self::with_kind(DescriptorKind::Error, name, TypeId::ERROR)
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_dispatch_receiver(mut self, ty: TypeId) -> Self {
        self.dispatch_receiver = Some(ty);
        self
    }

    pub fn with_extension_receiver(mut self, ty: TypeId) -> Self {
        self.extension_receiver = Some(ty);
        self
    }

    pub fn with_flags(mut self, flags: DescriptorFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DescriptorKind::Error
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self.kind,
            DescriptorKind::Function | DescriptorKind::Constructor
        )
    }

    pub fn is_property(&self) -> bool {
        self.kind == DescriptorKind::Property
    }

    /// Whether the callable's own type parameters may be substituted when it
    /// is referenced with `::`.
    pub fn is_supported_for_callable_reference(&self) -> bool {
        !self.is_error() && !self.flags.contains(DescriptorFlags::SYNTHETIC)
    }

    /// The declared signature, before any substitution.
    pub fn signature(&self) -> Signature {
        Signature {
            dispatch_receiver: self.dispatch_receiver,
            extension_receiver: self.extension_receiver,
            params: self.params.iter().map(|p| p.ty).collect(),
            return_type: self.return_type,
        }
    }
}

/// The types of a callable with every substitution applied; the "resulting
/// descriptor" of a finalized call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub dispatch_receiver: Option<TypeId>,
    pub extension_receiver: Option<TypeId>,
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
}

impl Signature {
    /// Build a new signature with `f` applied to every type.
    pub fn map_types(&self, mut f: impl FnMut(TypeId) -> TypeId) -> Signature {
        Signature {
            dispatch_receiver: self.dispatch_receiver.map(&mut f),
            extension_receiver: self.extension_receiver.map(&mut f),
            params: self.params.iter().map(|&ty| f(ty)).collect(),
            return_type: f(self.return_type),
        }
    }
}

/// Where a receiver value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReceiverKind {
    /// An expression written at the call site (`a` in `a.f()`).
    Expression(NodeId),
    /// `this` of an enclosing scope.
    Implicit,
    /// Stands in for the first argument of an unbound reference (`Type::f`).
    Transient,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReceiverValue {
    pub ty: TypeId,
    pub kind: ReceiverKind,
}

impl ReceiverValue {
    pub fn expression(node: NodeId, ty: TypeId) -> Self {
        Self {
            ty,
            kind: ReceiverKind::Expression(node),
        }
    }

    pub fn implicit(ty: TypeId) -> Self {
        Self {
            ty,
            kind: ReceiverKind::Implicit,
        }
    }

    pub fn transient(ty: TypeId) -> Self {
        Self {
            ty,
            kind: ReceiverKind::Transient,
        }
    }

    pub fn replace_type(self, ty: TypeId) -> Self {
        Self { ty, ..self }
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ReceiverKind::Transient
    }
}

/// Which of the candidate's receivers was written explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExplicitReceiverKind {
    #[default]
    NoExplicitReceiver,
    DispatchReceiver,
    ExtensionReceiver,
    BothReceivers,
}

impl ExplicitReceiverKind {
    /// Pick the explicit receiver out of a candidate's receivers.
    pub fn select<T>(self, dispatch: Option<T>, extension: Option<T>) -> Option<T> {
        match self {
            ExplicitReceiverKind::DispatchReceiver => dispatch,
            ExplicitReceiverKind::ExtensionReceiver => extension,
            ExplicitReceiverKind::NoExplicitReceiver | ExplicitReceiverKind::BothReceivers => {
                None
            }
        }
    }
}

/// An argument as seen by the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallArgument {
    /// An argument expression written at the call site.
    Expression { node: NodeId },
    /// Positional slot of a callable reference's expected function type.
    FakeForCallableReference { index: usize },
}

/// How one declared parameter is satisfied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedCallArgument {
    /// The parameter's default value.
    Default,
    Simple(CallArgument),
    /// Zero or more arguments grouped into a vararg parameter.
    Vararg(Vec<CallArgument>),
}

/// The overload chosen for a call site.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub descriptor: Arc<CallableDescriptor>,
    pub dispatch_receiver: Option<ReceiverValue>,
    pub extension_receiver: Option<ReceiverValue>,
    pub explicit_receiver_kind: ExplicitReceiverKind,
    /// Inference variables standing for `descriptor.type_params`, in order.
    pub fresh_variables: Vec<InferenceVar>,
    /// Parameter index -> argument(s) satisfying it.
    pub argument_mapping: IndexMap<usize, ResolvedCallArgument>,
}

impl Candidate {
    pub fn new(descriptor: Arc<CallableDescriptor>) -> Self {
        Self {
            descriptor,
            dispatch_receiver: None,
            extension_receiver: None,
            explicit_receiver_kind: ExplicitReceiverKind::NoExplicitReceiver,
            fresh_variables: Vec::new(),
            argument_mapping: IndexMap::new(),
        }
    }

    pub fn with_dispatch_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.dispatch_receiver = Some(receiver);
        self
    }

    pub fn with_extension_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    pub fn with_explicit_receiver_kind(mut self, kind: ExplicitReceiverKind) -> Self {
        self.explicit_receiver_kind = kind;
        self
    }

    pub fn with_fresh_variables(mut self, vars: Vec<InferenceVar>) -> Self {
        self.fresh_variables = vars;
        self
    }

    pub fn with_argument(mut self, parameter: usize, argument: ResolvedCallArgument) -> Self {
        self.argument_mapping.insert(parameter, argument);
        self
    }

    pub fn is_error(&self) -> bool {
        self.descriptor.is_error()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CoercionStrategy {
    #[default]
    NoCoercion,
    /// The reference's result is discarded to fit an expected `Unit` return.
    CoercionToUnit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SuspendConversionStrategy {
    #[default]
    NoConversion,
    /// A plain function referenced where a `suspend` function type is expected.
    SuspendConversion,
}

/// How a reference's declared parameters map onto the expected function type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallableReferenceAdaptation {
    /// Parameter index -> argument(s), in declaration order.
    pub mapped_arguments: IndexMap<usize, ResolvedCallArgument>,
    pub coercion: CoercionStrategy,
    pub suspend_conversion: SuspendConversionStrategy,
}

impl CallableReferenceAdaptation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_argument(mut self, parameter: usize, argument: ResolvedCallArgument) -> Self {
        self.mapped_arguments.insert(parameter, argument);
        self
    }

    pub fn with_coercion(mut self, coercion: CoercionStrategy) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn with_suspend_conversion(mut self, conversion: SuspendConversionStrategy) -> Self {
        self.suspend_conversion = conversion;
        self
    }
}

/// The member a `::name` expression resolved to.
#[derive(Clone, Debug)]
pub struct CallableReferenceCandidate {
    pub descriptor: Arc<CallableDescriptor>,
    pub dispatch_receiver: Option<ReceiverValue>,
    pub extension_receiver: Option<ReceiverValue>,
    pub explicit_receiver_kind: ExplicitReceiverKind,
    pub fresh_variables: Vec<InferenceVar>,
    /// The reference's reflective type (`(A) -> R` for a function, the
    /// property type for a property), still mentioning fresh variables.
    pub reflection_type: TypeId,
    pub adaptation: Option<CallableReferenceAdaptation>,
}

impl CallableReferenceCandidate {
    pub fn new(descriptor: Arc<CallableDescriptor>, reflection_type: TypeId) -> Self {
        Self {
            descriptor,
            dispatch_receiver: None,
            extension_receiver: None,
            explicit_receiver_kind: ExplicitReceiverKind::NoExplicitReceiver,
            fresh_variables: Vec::new(),
            reflection_type,
            adaptation: None,
        }
    }

    pub fn with_dispatch_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.dispatch_receiver = Some(receiver);
        self
    }

    pub fn with_extension_receiver(mut self, receiver: ReceiverValue) -> Self {
        self.extension_receiver = Some(receiver);
        self
    }

    pub fn with_explicit_receiver_kind(mut self, kind: ExplicitReceiverKind) -> Self {
        self.explicit_receiver_kind = kind;
        self
    }

    pub fn with_fresh_variables(mut self, vars: Vec<InferenceVar>) -> Self {
        self.fresh_variables = vars;
        self
    }

    pub fn with_adaptation(mut self, adaptation: CallableReferenceAdaptation) -> Self {
        self.adaptation = Some(adaptation);
        self
    }
}
