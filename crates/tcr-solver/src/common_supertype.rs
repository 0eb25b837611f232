//! Least upper bound of a set of types.
//!
//! Algorithm:
//! 1. `ERROR` anywhere propagates; `Nothing` never contributes.
//! 2. Nullability is lifted: compute over the non-null parts, re-apply `?`.
//! 3. If one candidate is a supertype of all others, it wins.
//! 4. Function types with identical receivers and parameters join their
//!    return types.
//! 5. Otherwise walk the first type's supertypes breadth-first and take the
//!    first one every type is a subtype of (`Any` at worst).

use crate::TypeDatabase;
use crate::class_hierarchy::ClassHierarchy;
use crate::subtype::SubtypeChecker;
use crate::types::{FunctionShape, TypeData, TypeId};
use tracing::trace;

pub struct CommonSupertypeCalculator<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> CommonSupertypeCalculator<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    pub fn common_supertype(&self, types: &[TypeId]) -> TypeId {
        if types.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }

        let mut nullable = false;
        let mut unique: Vec<TypeId> = Vec::with_capacity(types.len());
        for &ty in types {
            let inner = match self.db.lookup(ty) {
                Some(TypeData::Nullable(inner)) => {
                    nullable = true;
                    inner
                }
                _ => ty,
            };
            if inner != TypeId::NOTHING && !unique.contains(&inner) {
                unique.push(inner);
            }
        }

        let result = match unique.as_slice() {
            [] => TypeId::NOTHING,
            [single] => *single,
            _ => self.join_non_null(&unique),
        };
        trace!(?types, ?result, nullable, "common_supertype");
        if nullable {
            self.db.nullable(result)
        } else {
            result
        }
    }

    fn join_non_null(&self, types: &[TypeId]) -> TypeId {
        let mut checker = SubtypeChecker::new(self.db);
        for &candidate in types {
            if types.iter().all(|&ty| checker.is_subtype(ty, candidate)) {
                return candidate;
            }
        }

        if let Some(joined) = self.join_functions(types) {
            return joined;
        }

        let hierarchy = ClassHierarchy::new(self.db);
        for supertype in hierarchy.supertypes_breadth_first(types[0]) {
            if types.iter().all(|&ty| checker.is_subtype(ty, supertype)) {
                return supertype;
            }
        }
        TypeId::ANY
    }

    fn join_functions(&self, types: &[TypeId]) -> Option<TypeId> {
        let mut shapes: Vec<FunctionShape> = Vec::with_capacity(types.len());
        for &ty in types {
            match self.db.lookup(ty) {
                Some(TypeData::Function(shape)) => shapes.push(shape),
                _ => return None,
            }
        }
        let first = shapes.first()?.clone();
        let same_inputs = shapes.iter().all(|shape| {
            shape.receiver == first.receiver
                && shape.params == first.params
                && shape.is_suspend == first.is_suspend
        });
        if !same_inputs {
            return None;
        }
        let returns: Vec<TypeId> = shapes.iter().map(|shape| shape.return_type).collect();
        Some(self.db.function(FunctionShape {
            return_type: self.common_supertype(&returns),
            ..first
        }))
    }
}

#[cfg(test)]
#[path = "../tests/common_supertype_tests.rs"]
mod tests;
