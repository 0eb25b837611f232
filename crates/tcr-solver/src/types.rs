//! Structural type representation.
//!
//! Types are interned: a `TypeId` is a `u32` handle into the `TypeInterner`,
//! so equality is a single comparison. `TypeData` is the structure behind a
//! handle.

use smallvec::SmallVec;
use tcr_common::interner::Atom;

/// Inline capacity of argument / parameter lists.
const TYPE_LIST_INLINE: usize = 4;

pub type TypeList = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Unresolved symbol / failed inference. Related to every type both ways.
    pub const ERROR: TypeId = TypeId(0);
    /// Top of the non-nullable lattice.
    pub const ANY: TypeId = TypeId(1);
    /// Bottom of the lattice.
    pub const NOTHING: TypeId = TypeId(2);
    pub const UNIT: TypeId = TypeId(3);
    pub const BOOLEAN: TypeId = TypeId(4);
    pub const CHAR: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const INT: TypeId = TypeId(8);
    pub const LONG: TypeId = TypeId(9);
    pub const DOUBLE: TypeId = TypeId(10);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 11;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    #[inline]
    pub const fn is_unit(self) -> bool {
        self.0 == Self::UNIT.0
    }
}

/// Built-in types that are not backed by a class declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Error,
    Any,
    Nothing,
    Unit,
    Boolean,
    Char,
    String,
    Number,
    Int,
    Long,
    Double,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 11] = [
        IntrinsicKind::Error,
        IntrinsicKind::Any,
        IntrinsicKind::Nothing,
        IntrinsicKind::Unit,
        IntrinsicKind::Boolean,
        IntrinsicKind::Char,
        IntrinsicKind::String,
        IntrinsicKind::Number,
        IntrinsicKind::Int,
        IntrinsicKind::Long,
        IntrinsicKind::Double,
    ];

    pub const fn type_id(self) -> TypeId {
        TypeId(self as u32)
    }

    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Error => "<error>",
            IntrinsicKind::Any => "Any",
            IntrinsicKind::Nothing => "Nothing",
            IntrinsicKind::Unit => "Unit",
            IntrinsicKind::Boolean => "Boolean",
            IntrinsicKind::Char => "Char",
            IntrinsicKind::String => "String",
            IntrinsicKind::Number => "Number",
            IntrinsicKind::Int => "Int",
            IntrinsicKind::Long => "Long",
            IntrinsicKind::Double => "Double",
        }
    }
}

/// An inference variable introduced by constraint collection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InferenceVar(pub u32);

/// A declared type parameter of a class or callable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub upper_bound: TypeId,
}

/// Handle of a registered class declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub u32);

/// A class declaration as seen by the lattice.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub name: Atom,
    pub type_params: Vec<TypeParamId>,
    /// Direct supertypes, expressed over `type_params`.
    pub supertypes: Vec<TypeId>,
    /// Supertypes named by the declaration but absent from the class table.
    pub missing_supertypes: Vec<Atom>,
    pub is_abstract: bool,
    pub is_annotation: bool,
}

impl ClassInfo {
    pub fn new(name: Atom) -> Self {
        Self {
            name,
            type_params: Vec::new(),
            supertypes: Vec::new(),
            missing_supertypes: Vec::new(),
            is_abstract: false,
            is_annotation: false,
        }
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParamId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_supertypes(mut self, supertypes: Vec<TypeId>) -> Self {
        self.supertypes = supertypes;
        self
    }

    pub fn with_missing_supertype(mut self, name: Atom) -> Self {
        self.missing_supertypes.push(name);
        self
    }

    pub const fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub const fn annotation_class(mut self) -> Self {
        self.is_annotation = true;
        self
    }
}

/// Functional type: `Receiver.(P1, P2) -> R`, optionally `suspend`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub receiver: Option<TypeId>,
    pub params: TypeList,
    pub return_type: TypeId,
    pub is_suspend: bool,
}

impl FunctionShape {
    pub fn new(params: impl IntoIterator<Item = TypeId>, return_type: TypeId) -> Self {
        Self {
            receiver: None,
            params: params.into_iter().collect(),
            return_type,
            is_suspend: false,
        }
    }

    pub fn with_receiver(mut self, receiver: TypeId) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn suspend(mut self) -> Self {
        self.is_suspend = true;
        self
    }
}

/// The structure behind a `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// `C<A1, ..., An>`
    Class { class: ClassId, args: TypeList },
    Function(FunctionShape),
    TypeParameter(TypeParamId),
    /// Inference variable not yet replaced by the result substitutor.
    Variable(InferenceVar),
    /// Placeholder for a variable whose inference is postponed until an
    /// outer call completes (builder-style lambdas).
    Stub(InferenceVar),
    /// Capture-only type produced while solving; only its bounds may escape.
    Captured { lower: TypeId, upper: TypeId },
    /// A type declared inside a lambda body, visible only there.
    Local { class: ClassId, supertype: TypeId },
    /// `T?`
    Nullable(TypeId),
}
