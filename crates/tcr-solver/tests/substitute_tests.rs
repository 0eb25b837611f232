use super::*;
use crate::TypeInterner;
use crate::types::ClassInfo;

#[test]
fn test_inference_substitutor_replaces_variables() {
    let interner = TypeInterner::new();
    let var = interner.fresh_var();
    let f = interner.function(FunctionShape::new([interner.variable(var)], TypeId::UNIT));

    let subst: InferenceSubstitutor = [(var, TypeId::STRING)].into_iter().collect();
    let expected = interner.function(FunctionShape::new([TypeId::STRING], TypeId::UNIT));
    assert_eq!(subst.safe_substitute(&interner, f), expected);
}

#[test]
fn test_unchanged_type_returns_none() {
    let interner = TypeInterner::new();
    let var = interner.fresh_var();
    let other = interner.fresh_var();
    let subst: InferenceSubstitutor = [(var, TypeId::INT)].into_iter().collect();

    let untouched = interner.nullable(interner.variable(other));
    assert_eq!(subst.substitute(&interner, untouched), None);
    assert_eq!(subst.substitute(&interner, TypeId::STRING), None);
    assert_eq!(subst.safe_substitute(&interner, untouched), untouched);
}

#[test]
fn test_stub_types_are_not_substituted() {
    let interner = TypeInterner::new();
    let var = interner.fresh_var();
    let subst: InferenceSubstitutor = [(var, TypeId::INT)].into_iter().collect();
    let stub = interner.stub(var);
    assert_eq!(subst.safe_substitute(&interner, stub), stub);
}

#[test]
fn test_type_substitution_through_class_args() {
    let interner = TypeInterner::new();
    let t = interner.fresh_type_param("T", TypeId::ANY);
    let list = interner.register_class(
        ClassInfo::new(interner.intern_string("List")).with_type_params(vec![t]),
    );
    let list_t = interner.class_type(list, &[interner.type_parameter(t)]);

    let subst = TypeSubstitution::from_args(&[t], &[TypeId::INT]);
    assert_eq!(
        subst.safe_substitute(&interner, list_t),
        interner.class_type(list, &[TypeId::INT])
    );
}

#[test]
fn test_chained_substitutor_applies_first_then_second() {
    let interner = TypeInterner::new();
    let t = interner.fresh_type_param("T", TypeId::ANY);
    let var = interner.fresh_var();

    // T -> var, then var -> String
    let first = TypeSubstitution::from_args(&[t], &[interner.variable(var)]);
    let second: InferenceSubstitutor = [(var, TypeId::STRING)].into_iter().collect();
    let chained = ChainedSubstitutor::new(&first, &second);

    let f = interner.function(FunctionShape::new(
        [interner.type_parameter(t)],
        interner.variable(var),
    ));
    let expected = interner.function(FunctionShape::new([TypeId::STRING], TypeId::STRING));
    assert_eq!(chained.safe_substitute(&interner, f), expected);
    assert!(!chained.is_empty());
}

#[test]
fn test_chained_keeps_first_result_when_second_is_noop() {
    let interner = TypeInterner::new();
    let t = interner.fresh_type_param("T", TypeId::ANY);
    let first = TypeSubstitution::from_args(&[t], &[TypeId::LONG]);
    let chained = ChainedSubstitutor::new(&first, &EmptySubstitutor);
    assert_eq!(
        chained.substitute(&interner, interner.type_parameter(t)),
        Some(TypeId::LONG)
    );
}

#[test]
fn test_depth_limit_degrades_to_error() {
    let interner = TypeInterner::new();
    let var = interner.fresh_var();
    let mut ty = interner.variable(var);
    for _ in 0..8 {
        ty = interner.nullable(interner.function(FunctionShape::new([ty], TypeId::UNIT)));
    }
    let subst: InferenceSubstitutor = [(var, TypeId::INT)].into_iter().collect();
    let result = TypeInstantiator::new(&interner, &subst)
        .with_max_depth(3)
        .instantiate(ty);
    assert!(result.is_some());
    assert!(crate::visitor::contains_error_type(&interner, result.unwrap()));
}

#[test]
fn test_empty_substitutor_is_identity() {
    let interner = TypeInterner::new();
    let v = interner.variable(interner.fresh_var());
    assert_eq!(EmptySubstitutor.substitute(&interner, v), None);
    assert!(EmptySubstitutor.is_empty());
}
