//! Type substitution.
//!
//! A `Substitutor` maps leaf types (inference variables, declared type
//! parameters) to replacement types. `TypeInstantiator` walks a type tree
//! and rebuilds only the parts that actually change, so substituting a type
//! with no matching leaves returns `None` and keeps the original handle.

use crate::TypeDatabase;
use crate::types::{FunctionShape, InferenceVar, TypeData, TypeId, TypeList, TypeParamId};
use rustc_hash::FxHashMap;
use tcr_common::limits::MAX_SUBSTITUTION_DEPTH;

/// The leaf a substitutor may replace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubstitutionKey {
    Variable(InferenceVar),
    Parameter(TypeParamId),
}

pub trait Substitutor: Send + Sync {
    /// Replacement for a single leaf, if this substitutor maps it.
    fn replacement(&self, key: SubstitutionKey) -> Option<TypeId>;

    fn is_empty(&self) -> bool;

    /// Substitute through `ty`. `None` means nothing changed.
    fn substitute(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeId> {
        if self.is_empty() {
            return None;
        }
        TypeInstantiator::new(db, self).instantiate(ty)
    }

    /// Substitute through `ty`, returning `ty` itself when nothing changed.
    fn safe_substitute(&self, db: &dyn TypeDatabase, ty: TypeId) -> TypeId {
        self.substitute(db, ty).unwrap_or(ty)
    }
}

/// Identity substitution.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptySubstitutor;

impl Substitutor for EmptySubstitutor {
    fn replacement(&self, _key: SubstitutionKey) -> Option<TypeId> {
        None
    }

    fn is_empty(&self) -> bool {
        true
    }
}

/// Result of constraint solving: every inference variable of one top-level
/// expression mapped to its solution.
#[derive(Clone, Debug, Default)]
pub struct InferenceSubstitutor {
    map: FxHashMap<InferenceVar, TypeId>,
}

impl InferenceSubstitutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: InferenceVar, ty: TypeId) {
        self.map.insert(var, ty);
    }

    pub fn get(&self, var: InferenceVar) -> Option<TypeId> {
        self.map.get(&var).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

impl FromIterator<(InferenceVar, TypeId)> for InferenceSubstitutor {
    fn from_iter<I: IntoIterator<Item = (InferenceVar, TypeId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl Substitutor for InferenceSubstitutor {
    fn replacement(&self, key: SubstitutionKey) -> Option<TypeId> {
        match key {
            SubstitutionKey::Variable(var) => self.get(var),
            SubstitutionKey::Parameter(_) => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Substitution of declared type parameters (a class's or a callable's).
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<TypeParamId, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip type parameters with arguments; extra entries on either side are ignored.
    pub fn from_args(params: &[TypeParamId], args: &[TypeId]) -> Self {
        Self {
            map: params.iter().copied().zip(args.iter().copied()).collect(),
        }
    }

    pub fn insert(&mut self, param: TypeParamId, ty: TypeId) {
        self.map.insert(param, ty);
    }

    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }
}

impl Substitutor for TypeSubstitution {
    fn replacement(&self, key: SubstitutionKey) -> Option<TypeId> {
        match key {
            SubstitutionKey::Parameter(param) => self.get(param),
            SubstitutionKey::Variable(_) => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Applies `first`, then `second` to the result.
pub struct ChainedSubstitutor<'a> {
    first: &'a dyn Substitutor,
    second: &'a dyn Substitutor,
}

impl<'a> ChainedSubstitutor<'a> {
    pub fn new(first: &'a dyn Substitutor, second: &'a dyn Substitutor) -> Self {
        Self { first, second }
    }
}

impl Substitutor for ChainedSubstitutor<'_> {
    fn replacement(&self, key: SubstitutionKey) -> Option<TypeId> {
        self.first
            .replacement(key)
            .or_else(|| self.second.replacement(key))
    }

    fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }

    fn substitute(&self, db: &dyn TypeDatabase, ty: TypeId) -> Option<TypeId> {
        let after_first = self.first.substitute(db, ty);
        let intermediate = after_first.unwrap_or(ty);
        self.second.substitute(db, intermediate).or(after_first)
    }
}

/// Rebuilds a type tree with leaves replaced by a substitutor.
pub struct TypeInstantiator<'a, S: Substitutor + ?Sized> {
    db: &'a dyn TypeDatabase,
    substitutor: &'a S,
    depth: u32,
    max_depth: u32,
}

impl<'a, S: Substitutor + ?Sized> TypeInstantiator<'a, S> {
    pub fn new(db: &'a dyn TypeDatabase, substitutor: &'a S) -> Self {
        Self {
            db,
            substitutor,
            depth: 0,
            max_depth: MAX_SUBSTITUTION_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Substitute through `ty`; `None` when the type is unchanged.
    pub fn instantiate(&mut self, ty: TypeId) -> Option<TypeId> {
        if ty.is_intrinsic() {
            return None;
        }
        if self.depth >= self.max_depth {
            return Some(TypeId::ERROR);
        }
        let data = self.db.lookup(ty)?;
        self.depth += 1;
        let result = self.instantiate_data(data);
        self.depth -= 1;
        result
    }

    fn instantiate_data(&mut self, data: TypeData) -> Option<TypeId> {
        match data {
            TypeData::Variable(var) => self.substitutor.replacement(SubstitutionKey::Variable(var)),
            TypeData::TypeParameter(param) => self
                .substitutor
                .replacement(SubstitutionKey::Parameter(param)),
            TypeData::Stub(_) | TypeData::Intrinsic(_) => None,
            TypeData::Class { class, args } => {
                let args = self.instantiate_list(&args)?;
                Some(self.db.intern(TypeData::Class { class, args }))
            }
            TypeData::Function(shape) => {
                let receiver = shape.receiver.map(|r| (r, self.instantiate(r)));
                let params = self.instantiate_list(&shape.params);
                let return_type = self.instantiate(shape.return_type);
                let receiver_changed = matches!(receiver, Some((_, Some(_))));
                if !receiver_changed && params.is_none() && return_type.is_none() {
                    return None;
                }
                Some(self.db.function(FunctionShape {
                    receiver: receiver.map(|(old, new)| new.unwrap_or(old)),
                    params: params.unwrap_or(shape.params),
                    return_type: return_type.unwrap_or(shape.return_type),
                    is_suspend: shape.is_suspend,
                }))
            }
            TypeData::Captured { lower, upper } => {
                let new_lower = self.instantiate(lower);
                let new_upper = self.instantiate(upper);
                if new_lower.is_none() && new_upper.is_none() {
                    return None;
                }
                Some(self.db.captured(
                    new_lower.unwrap_or(lower),
                    new_upper.unwrap_or(upper),
                ))
            }
            TypeData::Local { class, supertype } => {
                let supertype = self.instantiate(supertype)?;
                Some(self.db.intern(TypeData::Local { class, supertype }))
            }
            TypeData::Nullable(inner) => {
                let inner = self.instantiate(inner)?;
                Some(self.db.nullable(inner))
            }
        }
    }

    fn instantiate_list(&mut self, list: &TypeList) -> Option<TypeList> {
        let mut changed = false;
        let mut out = TypeList::with_capacity(list.len());
        for &ty in list {
            match self.instantiate(ty) {
                Some(new) => {
                    changed = true;
                    out.push(new);
                }
                None => out.push(ty),
            }
        }
        changed.then_some(out)
    }
}

#[cfg(test)]
#[path = "../tests/substitute_tests.rs"]
mod tests;
