//! Supertype queries over the class table.
//!
//! Supertypes are declared over a class's own type parameters; asking for
//! the supertypes of `C<A>` instantiates them with `A`.

use crate::TypeDatabase;
use crate::substitute::{Substitutor, TypeSubstitution};
use crate::types::{IntrinsicKind, TypeData, TypeId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tcr_common::interner::Atom;
use tcr_common::limits::MAX_SUPERTYPE_SEARCH;

pub struct ClassHierarchy<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> ClassHierarchy<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    /// Immediate supertypes of `ty`, instantiated for its arguments.
    ///
    /// `Any` has none; every other non-nullable type has at least one.
    pub fn direct_supertypes(&self, ty: TypeId) -> Vec<TypeId> {
        let Some(data) = self.db.lookup(ty) else {
            return Vec::new();
        };
        match data {
            TypeData::Intrinsic(kind) => match kind {
                IntrinsicKind::Any | IntrinsicKind::Error => Vec::new(),
                IntrinsicKind::Int | IntrinsicKind::Long | IntrinsicKind::Double => {
                    vec![TypeId::NUMBER]
                }
                _ => vec![TypeId::ANY],
            },
            TypeData::Class { class, args } => {
                let Some(info) = self.db.class_info(class) else {
                    return vec![TypeId::ANY];
                };
                if info.supertypes.is_empty() {
                    return vec![TypeId::ANY];
                }
                let subst = TypeSubstitution::from_args(&info.type_params, &args);
                info.supertypes
                    .iter()
                    .map(|&s| subst.safe_substitute(self.db, s))
                    .collect()
            }
            TypeData::Local { supertype, .. } => vec![supertype],
            TypeData::Captured { upper, .. } => vec![upper],
            TypeData::TypeParameter(param) => {
                let bound = self
                    .db
                    .type_param_info(param)
                    .map_or(TypeId::ANY, |info| info.upper_bound);
                vec![bound]
            }
            TypeData::Function(_) | TypeData::Variable(_) | TypeData::Stub(_) => {
                vec![TypeId::ANY]
            }
            TypeData::Nullable(inner) => self
                .direct_supertypes(inner)
                .into_iter()
                .map(|s| self.db.nullable(s))
                .collect(),
        }
    }

    /// `ty` followed by all of its supertypes in breadth-first order.
    pub fn supertypes_breadth_first(&self, ty: TypeId) -> Vec<TypeId> {
        let mut order = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::from([ty]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            order.push(current);
            if order.len() >= MAX_SUPERTYPE_SEARCH {
                break;
            }
            queue.extend(self.direct_supertypes(current));
        }
        order
    }

    /// Names of supertypes that the class hierarchy of `ty` needs but the
    /// class table does not contain, in discovery order.
    pub fn missing_supertypes(&self, ty: TypeId) -> Vec<Atom> {
        let mut missing = Vec::new();
        for current in self.supertypes_breadth_first(ty) {
            let class = match self.db.lookup(current) {
                Some(TypeData::Class { class, .. }) => class,
                Some(TypeData::Nullable(inner)) => match self.db.lookup(inner) {
                    Some(TypeData::Class { class, .. }) => class,
                    _ => continue,
                },
                _ => continue,
            };
            if let Some(info) = self.db.class_info(class) {
                for &name in &info.missing_supertypes {
                    if !missing.contains(&name) {
                        missing.push(name);
                    }
                }
            }
        }
        missing
    }
}

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod tests;
