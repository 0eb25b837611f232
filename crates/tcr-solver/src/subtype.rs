//! Subtype relation.
//!
//! Rules, in order:
//! - identity, and `ERROR` is related to everything in both directions
//! - `Nothing` is the bottom, `Any?` the top, `Any` the top of non-null types
//! - nullability: `T <: U?` iff `T <: U` (after stripping `?` from `T`)
//! - capture-only and local types are compared through their bounds
//! - classes: same class with equal (invariant) arguments, or some
//!   instantiated supertype is a subtype of the target
//! - functions: receiver and parameters contravariant, return covariant,
//!   matching `suspend`-ness

use crate::TypeDatabase;
use crate::class_hierarchy::ClassHierarchy;
use crate::types::{FunctionShape, IntrinsicKind, TypeData, TypeId};
use tcr_common::limits::MAX_SUBTYPE_DEPTH;

pub struct SubtypeChecker<'a> {
    db: &'a dyn TypeDatabase,
    depth: u32,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db, depth: 0 }
    }

    pub fn is_subtype(&mut self, source: TypeId, target: TypeId) -> bool {
        if source == target || source == TypeId::ERROR || target == TypeId::ERROR {
            return true;
        }
        if source == TypeId::NOTHING {
            return true;
        }
        if self.depth >= MAX_SUBTYPE_DEPTH {
            return false;
        }
        self.depth += 1;
        let result = self.is_subtype_inner(source, target);
        self.depth -= 1;
        result
    }

    fn is_subtype_inner(&mut self, source: TypeId, target: TypeId) -> bool {
        let (Some(s), Some(t)) = (self.db.lookup(source), self.db.lookup(target)) else {
            return false;
        };

        if let TypeData::Nullable(target_inner) = t {
            let source_inner = match s {
                TypeData::Nullable(inner) => inner,
                _ => source,
            };
            return self.is_subtype(source_inner, target_inner);
        }

        match s {
            TypeData::Nullable(_) => return false,
            TypeData::Captured { upper, .. } => return self.is_subtype(upper, target),
            TypeData::Local { supertype, .. } => return self.is_subtype(supertype, target),
            _ => {}
        }
        if let TypeData::Captured { lower, .. } = t {
            return self.is_subtype(source, lower);
        }
        if target == TypeId::ANY {
            return true;
        }

        match (s, t) {
            (TypeData::Variable(_) | TypeData::Stub(_), _)
            | (_, TypeData::Variable(_) | TypeData::Stub(_)) => false,
            (TypeData::TypeParameter(param), _) => {
                let bound = self
                    .db
                    .type_param_info(param)
                    .map_or(TypeId::ANY, |info| info.upper_bound);
                bound != source && self.is_subtype(bound, target)
            }
            (TypeData::Intrinsic(kind), TypeData::Intrinsic(IntrinsicKind::Number)) => matches!(
                kind,
                IntrinsicKind::Int | IntrinsicKind::Long | IntrinsicKind::Double
            ),
            (TypeData::Function(a), TypeData::Function(b)) => self.is_function_subtype(&a, &b),
            (
                TypeData::Class {
                    class: source_class,
                    args: source_args,
                },
                TypeData::Class {
                    class: target_class,
                    args: target_args,
                },
            ) if source_class == target_class => source_args == target_args,
            (TypeData::Class { .. }, _) => {
                let supertypes = ClassHierarchy::new(self.db).direct_supertypes(source);
                supertypes.into_iter().any(|sup| self.is_subtype(sup, target))
            }
            _ => false,
        }
    }

    fn is_function_subtype(&mut self, source: &FunctionShape, target: &FunctionShape) -> bool {
        if source.is_suspend != target.is_suspend || source.params.len() != target.params.len() {
            return false;
        }
        let receivers_ok = match (source.receiver, target.receiver) {
            (None, None) => true,
            (Some(s), Some(t)) => self.is_subtype(t, s),
            _ => false,
        };
        receivers_ok
            && source
                .params
                .iter()
                .zip(target.params.iter())
                .all(|(&s, &t)| self.is_subtype(t, s))
            && self.is_subtype(source.return_type, target.return_type)
    }
}

/// Convenience wrapper around a fresh `SubtypeChecker`.
pub fn is_subtype_of(db: &dyn TypeDatabase, source: TypeId, target: TypeId) -> bool {
    SubtypeChecker::new(db).is_subtype(source, target)
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
