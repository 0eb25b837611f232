//! Structural queries over type trees.

use crate::TypeDatabase;
use crate::types::{TypeData, TypeId};

/// Call `f` on every direct child of `ty`.
pub fn for_each_child(db: &dyn TypeDatabase, ty: TypeId, mut f: impl FnMut(TypeId)) {
    let Some(data) = db.lookup(ty) else {
        return;
    };
    match data {
        TypeData::Class { args, .. } => args.iter().copied().for_each(f),
        TypeData::Function(shape) => {
            if let Some(receiver) = shape.receiver {
                f(receiver);
            }
            shape.params.iter().copied().for_each(&mut f);
            f(shape.return_type);
        }
        TypeData::Captured { lower, upper } => {
            f(lower);
            f(upper);
        }
        TypeData::Local { supertype, .. } => f(supertype),
        TypeData::Nullable(inner) => f(inner),
        TypeData::Intrinsic(_)
        | TypeData::TypeParameter(_)
        | TypeData::Variable(_)
        | TypeData::Stub(_) => {}
    }
}

/// Whether `ty` or any type nested in it satisfies `pred`.
pub fn contains_type_matching(
    db: &dyn TypeDatabase,
    ty: TypeId,
    pred: &dyn Fn(TypeId, &TypeData) -> bool,
) -> bool {
    let mut stack = vec![ty];
    let mut visited = rustc_hash::FxHashSet::default();
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        let Some(data) = db.lookup(current) else {
            continue;
        };
        if pred(current, &data) {
            return true;
        }
        for_each_child(db, current, |child| stack.push(child));
    }
    false
}

/// Whether a postponed-inference placeholder occurs anywhere in `ty`.
pub fn contains_stub_type(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    contains_type_matching(db, ty, &|_, data| matches!(data, TypeData::Stub(_)))
}

/// Whether an unsubstituted inference variable (or stub) occurs in `ty`.
pub fn contains_inference_variables(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    contains_type_matching(db, ty, &|_, data| {
        matches!(data, TypeData::Variable(_) | TypeData::Stub(_))
    })
}

pub fn contains_error_type(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    contains_type_matching(db, ty, &|id, _| id == TypeId::ERROR)
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
