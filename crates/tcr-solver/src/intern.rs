//! Type interning for structural deduplication.
//!
//! Converts `TypeData` structures into lightweight `TypeId` handles and owns
//! the class and type-parameter tables the lattice consults. One interner is
//! shared by every completion over a compilation unit, so all mutation goes
//! through `&self`.

use crate::types::*;
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tcr_common::interner::{Atom, Interner};
use tracing::trace;

/// Read/intern access to types, as needed by every solver operation.
///
/// Passed around as `&dyn TypeDatabase` so tests and drivers can supply
/// their own storage.
pub trait TypeDatabase: Send + Sync {
    fn lookup(&self, id: TypeId) -> Option<TypeData>;

    fn intern(&self, data: TypeData) -> TypeId;

    fn class_info(&self, class: ClassId) -> Option<Arc<ClassInfo>>;

    fn type_param_info(&self, param: TypeParamId) -> Option<TypeParamInfo>;

    fn names(&self) -> &Interner;

    fn function(&self, shape: FunctionShape) -> TypeId {
        self.intern(TypeData::Function(shape))
    }

    fn class_type(&self, class: ClassId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Class {
            class,
            args: args.iter().copied().collect(),
        })
    }

    fn nullable(&self, inner: TypeId) -> TypeId {
        match self.lookup(inner) {
            Some(TypeData::Nullable(_)) => inner,
            _ if inner == TypeId::ERROR => inner,
            _ => self.intern(TypeData::Nullable(inner)),
        }
    }

    fn variable(&self, var: InferenceVar) -> TypeId {
        self.intern(TypeData::Variable(var))
    }

    fn stub(&self, var: InferenceVar) -> TypeId {
        self.intern(TypeData::Stub(var))
    }

    fn type_parameter(&self, param: TypeParamId) -> TypeId {
        self.intern(TypeData::TypeParameter(param))
    }

    fn captured(&self, lower: TypeId, upper: TypeId) -> TypeId {
        self.intern(TypeData::Captured { lower, upper })
    }
}

#[derive(Default)]
struct TypeTable {
    key_to_id: FxHashMap<TypeData, TypeId>,
    id_to_key: Vec<TypeData>,
}

/// The default `TypeDatabase`.
pub struct TypeInterner {
    names: Interner,
    types: RwLock<TypeTable>,
    classes: DashMap<ClassId, Arc<ClassInfo>>,
    type_params: DashMap<TypeParamId, TypeParamInfo>,
    next_class: AtomicU32,
    next_type_param: AtomicU32,
    next_var: AtomicU32,
}

impl TypeInterner {
    pub fn new() -> Self {
        let mut table = TypeTable::default();
        for kind in IntrinsicKind::ALL {
            let data = TypeData::Intrinsic(kind);
            table.key_to_id.insert(data.clone(), kind.type_id());
            table.id_to_key.push(data);
        }
        debug_assert_eq!(table.id_to_key.len() as u32, TypeId::FIRST_USER);
        Self {
            names: Interner::new(),
            types: RwLock::new(table),
            classes: DashMap::new(),
            type_params: DashMap::new(),
            next_class: AtomicU32::new(0),
            next_type_param: AtomicU32::new(0),
            next_var: AtomicU32::new(0),
        }
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.names.intern(s)
    }

    /// Register a class declaration.
    pub fn register_class(&self, info: ClassInfo) -> ClassId {
        let id = ClassId(self.next_class.fetch_add(1, Ordering::SeqCst));
        trace!(class = id.0, name = info.name.0, "register_class");
        self.classes.insert(id, Arc::new(info));
        id
    }

    /// Replace the supertypes of an already registered class.
    ///
    /// Supertypes may mention the class itself (`Comparable<T>`), so they are
    /// often only expressible after registration.
    pub fn set_supertypes(&self, class: ClassId, supertypes: Vec<TypeId>) {
        if let Some(mut entry) = self.classes.get_mut(&class) {
            let mut info = (**entry).clone();
            info.supertypes = supertypes;
            *entry = Arc::new(info);
        }
    }

    pub fn fresh_type_param(&self, name: &str, upper_bound: TypeId) -> TypeParamId {
        let id = TypeParamId(self.next_type_param.fetch_add(1, Ordering::SeqCst));
        let name = self.names.intern(name);
        self.type_params.insert(id, TypeParamInfo { name, upper_bound });
        id
    }

    /// Allocate a new inference variable.
    pub fn fresh_var(&self) -> InferenceVar {
        InferenceVar(self.next_var.fetch_add(1, Ordering::SeqCst))
    }

    /// Declare a local class nested in a lambda and return its type.
    pub fn local_type(&self, name: &str, supertype: TypeId) -> TypeId {
        let class = self.register_class(
            ClassInfo::new(self.names.intern(name)).with_supertypes(vec![supertype]),
        );
        self.intern(TypeData::Local { class, supertype })
    }

    pub fn len(&self) -> usize {
        self.types.read().map(|t| t.id_to_key.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() as u32 <= TypeId::FIRST_USER
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase for TypeInterner {
    fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let table = self.types.read().ok()?;
        table.id_to_key.get(id.0 as usize).cloned()
    }

    fn intern(&self, data: TypeData) -> TypeId {
        if let TypeData::Intrinsic(kind) = data {
            return kind.type_id();
        }
        if let Ok(table) = self.types.read()
            && let Some(&id) = table.key_to_id.get(&data)
        {
            return id;
        }
        let Ok(mut table) = self.types.write() else {
            return TypeId::ERROR;
        };
        if let Some(&id) = table.key_to_id.get(&data) {
            return id;
        }
        let id = TypeId(table.id_to_key.len() as u32);
        table.id_to_key.push(data.clone());
        table.key_to_id.insert(data, id);
        id
    }

    fn class_info(&self, class: ClassId) -> Option<Arc<ClassInfo>> {
        self.classes.get(&class).map(|entry| Arc::clone(entry.value()))
    }

    fn type_param_info(&self, param: TypeParamId) -> Option<TypeParamInfo> {
        self.type_params.get(&param).map(|entry| entry.value().clone())
    }

    fn names(&self) -> &Interner {
        &self.names
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
