//! Type approximation.
//!
//! Constraint solving can produce types that only make sense inside the
//! scope that produced them: capture-only types (`Captured`) and classes
//! declared inside a lambda body (`Local`). Before such a type is exposed as
//! a declaration's type or a receiver's type it is widened to a supertype
//! (narrowed to a subtype in contravariant positions).

use crate::TypeDatabase;
use crate::types::{FunctionShape, TypeData, TypeId, TypeList};
use crate::visitor::contains_type_matching;

/// What to approximate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApproximationConfig {
    pub captured: bool,
    pub local: bool,
}

impl ApproximationConfig {
    /// Final approximation after resolution and inference: nothing
    /// scope-bound survives.
    pub const FINAL: ApproximationConfig = ApproximationConfig {
        captured: true,
        local: true,
    };

    /// Declaration types of local declarations may keep local classes.
    pub const LOCAL_DECLARATION: ApproximationConfig = ApproximationConfig {
        captured: true,
        local: false,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Out,
    In,
}

impl Position {
    fn flip(self) -> Self {
        match self {
            Position::Out => Position::In,
            Position::In => Position::Out,
        }
    }
}

pub struct TypeApproximator<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> TypeApproximator<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    /// Widen scope-bound structure in `ty`. `None` when nothing changed.
    pub fn approximate_to_supertype(
        &self,
        ty: TypeId,
        config: ApproximationConfig,
    ) -> Option<TypeId> {
        self.approximate(ty, config, Position::Out)
    }

    /// Type to record on a declaration; `local` declarations keep local classes.
    pub fn approximate_declaration_type(&self, ty: TypeId, local: bool) -> TypeId {
        let config = if local {
            ApproximationConfig::LOCAL_DECLARATION
        } else {
            ApproximationConfig::FINAL
        };
        self.approximate_to_supertype(ty, config).unwrap_or(ty)
    }

    /// Whether `ty` can be written down in source (no captured/local parts).
    pub fn is_denotable(&self, ty: TypeId) -> bool {
        !contains_type_matching(self.db, ty, &|_, data| {
            matches!(data, TypeData::Captured { .. } | TypeData::Local { .. })
        })
    }

    fn approximate(
        &self,
        ty: TypeId,
        config: ApproximationConfig,
        position: Position,
    ) -> Option<TypeId> {
        if ty.is_intrinsic() {
            return None;
        }
        match self.db.lookup(ty)? {
            TypeData::Captured { lower, upper } if config.captured => {
                let bound = match position {
                    Position::Out => upper,
                    Position::In => lower,
                };
                Some(self.approximate(bound, config, position).unwrap_or(bound))
            }
            TypeData::Local { supertype, .. } if config.local => {
                Some(self.approximate(supertype, config, position).unwrap_or(supertype))
            }
            TypeData::Nullable(inner) => {
                let inner = self.approximate(inner, config, position)?;
                Some(self.db.nullable(inner))
            }
            TypeData::Class { class, args } => {
                // Arguments are invariant; without projections the upper bound is used.
                let args = self.approximate_list(&args, config, Position::Out)?;
                Some(self.db.intern(TypeData::Class { class, args }))
            }
            TypeData::Function(shape) => {
                let receiver = shape
                    .receiver
                    .map(|r| (r, self.approximate(r, config, position.flip())));
                let params = self.approximate_list(&shape.params, config, position.flip());
                let return_type = self.approximate(shape.return_type, config, position);
                if !matches!(receiver, Some((_, Some(_))))
                    && params.is_none()
                    && return_type.is_none()
                {
                    return None;
                }
                Some(self.db.function(FunctionShape {
                    receiver: receiver.map(|(old, new)| new.unwrap_or(old)),
                    params: params.unwrap_or(shape.params),
                    return_type: return_type.unwrap_or(shape.return_type),
                    is_suspend: shape.is_suspend,
                }))
            }
            _ => None,
        }
    }

    fn approximate_list(
        &self,
        list: &TypeList,
        config: ApproximationConfig,
        position: Position,
    ) -> Option<TypeList> {
        let mut changed = false;
        let out: TypeList = list
            .iter()
            .map(|&ty| match self.approximate(ty, config, position) {
                Some(new) => {
                    changed = true;
                    new
                }
                None => ty,
            })
            .collect();
        changed.then_some(out)
    }
}

#[cfg(test)]
#[path = "../tests/approximate_tests.rs"]
mod tests;
