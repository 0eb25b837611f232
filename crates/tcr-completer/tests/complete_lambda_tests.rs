mod common;

use common::Fixture;
use std::sync::Arc;
use tcr_common::NodeId;
use tcr_common::diagnostics::diagnostic_codes;
use tcr_completer::*;
use tcr_solver::{FunctionShape, TypeDatabase, TypeFormatter, TypeId};

fn returning(types: &[Option<TypeId>]) -> ResultArgumentsInfo {
    ResultArgumentsInfo {
        non_error_arguments: types
            .iter()
            .map(|&ty| LambdaResultArgument {
                expression: None,
                ty,
                data_flow_after: DataFlowInfo::empty(),
            })
            .collect(),
        return_arguments_exist: !types.is_empty(),
    }
}

fn lambda_atom(f: &mut Fixture, lambda: LambdaAtom) -> ResolvedAtom {
    let node = f.node();
    ResolvedAtom::new(node, AtomKind::Lambda(lambda))
}

fn literal(f: &mut Fixture) -> (NodeId, NodeId) {
    (f.node(), f.node())
}

fn coerced(f: &Fixture, tree: &AtomTree, atom: AtomId) -> Result<bool, CompletionError> {
    f.completer().is_coerced_to_unit(tree, atom)
}

#[test]
fn test_lambda_without_return_points_is_coerced_to_unit() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let mut tree = AtomTree::new();
    let atom = lambda_atom(
        &mut f,
        LambdaAtom::new(LambdaArgument::Literal { expression, function })
            .with_result_arguments(ResultArgumentsInfo::default()),
    );
    let id = tree.add(atom);
    assert_eq!(coerced(&f, &tree, id), Ok(true));
}

#[test]
fn test_unit_coercion_follows_common_supertype_of_returns() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let argument = LambdaArgument::Literal { expression, function };
    let mut tree = AtomTree::new();

    let cases = [
        (vec![Some(TypeId::INT)], false),
        (vec![Some(TypeId::UNIT), Some(TypeId::UNIT)], true),
        (vec![Some(TypeId::UNIT), Some(TypeId::INT)], false),
        (vec![Some(TypeId::NOTHING), Some(TypeId::UNIT)], true),
        // Untyped return points carry no information.
        (vec![None, Some(TypeId::UNIT)], true),
        (vec![None], false),
    ];
    for (types, expected) in cases {
        let atom = lambda_atom(
            &mut f,
            LambdaAtom::new(argument).with_result_arguments(returning(&types)),
        );
        let id = tree.add(atom);
        assert_eq!(coerced(&f, &tree, id), Ok(expected), "returns {types:?}");
    }
}

#[test]
fn test_unit_coercion_sees_solved_variables_only() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let argument = LambdaArgument::Literal { expression, function };
    let solved = f.types.fresh_var();
    let open = f.types.fresh_var();
    f.substitutor.insert(solved, TypeId::UNIT);
    let solved_ty = f.types.variable(solved);
    let open_ty = f.types.variable(open);

    let mut tree = AtomTree::new();
    let solved_atom = lambda_atom(
        &mut f,
        LambdaAtom::new(argument).with_result_arguments(returning(&[Some(solved_ty)])),
    );
    let open_atom = lambda_atom(
        &mut f,
        LambdaAtom::new(argument)
            .with_result_arguments(returning(&[Some(TypeId::UNIT), Some(open_ty)])),
    );
    let solved_id = tree.add(solved_atom);
    let open_id = tree.add(open_atom);

    assert_eq!(coerced(&f, &tree, solved_id), Ok(true));
    assert_eq!(coerced(&f, &tree, open_id), Ok(false));
}

#[test]
fn test_wrapper_lambda_inherits_unit_coercion() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let argument = LambdaArgument::Literal { expression, function };
    let mut tree = AtomTree::new();

    let wrapper = lambda_atom(&mut f, LambdaAtom::new(argument));
    let inner = lambda_atom(
        &mut f,
        LambdaAtom::new(argument).with_result_arguments(ResultArgumentsInfo::default()),
    );
    let wrapper_id = tree.add(wrapper);
    let inner_id = tree.add(inner);
    tree.add_child(wrapper_id, inner_id);
    assert_eq!(tree.unwrap_lambda(wrapper_id), inner_id);
    assert_eq!(coerced(&f, &tree, wrapper_id), Ok(true));

    let orphan = lambda_atom(&mut f, LambdaAtom::new(argument));
    let orphan_node = orphan.node;
    let orphan_id = tree.add(orphan);
    assert_eq!(
        coerced(&f, &tree, orphan_id),
        Err(CompletionError::MissingResultArguments { node: orphan_node })
    );
}

#[test]
fn test_map_lambda_gets_final_functional_type() {
    // list.map { it.toString() }
    let mut f = Fixture::new();
    let elem = f.class("Elem");
    let (expression, function, result) = (f.node(), f.node(), f.node());
    let (param_var, return_var) = (f.types.fresh_var(), f.types.fresh_var());
    f.substitutor.insert(param_var, elem);
    f.substitutor.insert(return_var, TypeId::STRING);
    let param_ty = f.types.variable(param_var);
    let return_ty = f.types.variable(return_var);

    let provisional = f.types.function(FunctionShape::new([param_ty], return_ty));
    f.store.record_type(expression, provisional);
    f.store.record_type(result, TypeId::STRING);
    f.store.record_function(
        function,
        Arc::new(FunctionSignature {
            params: vec![param_ty],
            return_type: Some(return_ty),
            ..FunctionSignature::default()
        }),
    );

    let flow = DataFlowInfo::empty().with_fact(result, TypeId::STRING);
    let lambda = LambdaAtom::new(LambdaArgument::Literal { expression, function })
        .with_parameters(vec![param_ty])
        .with_return_type(return_ty)
        .with_result_arguments(ResultArgumentsInfo {
            non_error_arguments: vec![LambdaResultArgument {
                expression: Some(result),
                ty: Some(TypeId::STRING),
                data_flow_after: flow.clone(),
            }],
            return_arguments_exist: true,
        });
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(expression, AtomKind::Lambda(lambda)));
    f.completer().complete_all(&mut tree, id).unwrap();

    let lambda_type = f.store.get_type(expression).unwrap();
    assert_eq!(TypeFormatter::new(&f.types).format(lambda_type), "(Elem) -> String");

    let signature = f.store.function(function).unwrap();
    assert_eq!(signature.params, vec![elem]);
    assert_eq!(signature.return_type, Some(TypeId::STRING));

    assert_eq!(f.store.expected_type(result), Some(TypeId::STRING));
    let info = f.store.expression_type_info(result).unwrap();
    assert_eq!(info.ty, Some(TypeId::STRING));
    assert_eq!(info.data_flow, flow);
    assert!(f.sink.is_empty());
    assert!(tree.get(id).unwrap().completed);
}

#[test]
fn test_fixed_declared_types_are_not_written_back() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let open = f.types.fresh_var();
    f.substitutor.insert(open, TypeId::STRING);
    let open_ty = f.types.variable(open);

    let declared = FunctionSignature {
        params: vec![TypeId::ANY, open_ty],
        return_type: Some(TypeId::ERROR),
        ..FunctionSignature::default()
    };
    let lambda = LambdaAtom::new(LambdaArgument::Literal { expression, function })
        .with_parameters(vec![TypeId::INT, open_ty])
        .with_return_type(TypeId::BOOLEAN)
        .with_result_arguments(returning(&[Some(TypeId::BOOLEAN)]));
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(expression, AtomKind::Lambda(lambda)));

    let (types, updated) = f
        .completer()
        .substitute_function_literal_descriptor(Some((&tree, id)), &declared, function)
        .unwrap();

    assert_eq!(updated.params, vec![TypeId::ANY, TypeId::STRING]);
    assert_eq!(updated.return_type, Some(TypeId::BOOLEAN));
    let substituted: Vec<TypeId> = types.parameters.iter().map(|p| p.substituted).collect();
    assert_eq!(substituted, vec![TypeId::INT, TypeId::STRING]);
    assert_eq!(types.return_type.substituted, TypeId::BOOLEAN);
    assert_eq!(types.receiver, None);
}

#[test]
fn test_descriptor_alone_supplies_types_without_atom() {
    let mut f = Fixture::new();
    let function = f.node();
    let receiver = f.class("Scope");
    let declared = FunctionSignature {
        extension_receiver: Some(receiver),
        params: vec![TypeId::INT],
        return_type: Some(TypeId::LONG),
        ..FunctionSignature::default()
    };
    let (types, updated) = f
        .completer()
        .substitute_function_literal_descriptor(None, &declared, function)
        .unwrap();
    assert_eq!(updated, declared);
    assert_eq!(types.receiver.map(|r| r.substituted), Some(receiver));
    assert_eq!(types.return_type.substituted, TypeId::LONG);

    let without_return = FunctionSignature {
        return_type: None,
        ..declared
    };
    assert_eq!(
        f.completer()
            .substitute_function_literal_descriptor(None, &without_return, function),
        Err(CompletionError::MissingReturnType { node: function })
    );
}

#[test]
fn test_coerced_lambda_returns_unit() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let return_var = f.types.fresh_var();
    f.substitutor.insert(return_var, TypeId::INT);
    let return_ty = f.types.variable(return_var);
    f.store.record_type(expression, TypeId::ERROR);
    f.store.record_function(
        function,
        Arc::new(FunctionSignature {
            return_type: Some(return_ty),
            ..FunctionSignature::default()
        }),
    );

    let lambda = LambdaAtom::new(LambdaArgument::Literal { expression, function })
        .with_return_type(return_ty)
        .with_result_arguments(ResultArgumentsInfo::default())
        .suspend();
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(expression, AtomKind::Lambda(lambda)));
    f.completer().complete_all(&mut tree, id).unwrap();

    let lambda_type = f.store.get_type(expression).unwrap();
    assert_eq!(TypeFormatter::new(&f.types).format(lambda_type), "suspend () -> Unit");
    assert_eq!(f.store.function(function).unwrap().return_type, Some(TypeId::UNIT));
}

#[test]
fn test_wrapper_completion_completes_inner_lambda_once() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    f.store.record_type(expression, TypeId::ERROR);
    f.store.record_function(
        function,
        Arc::new(FunctionSignature {
            return_type: Some(TypeId::UNIT),
            ..FunctionSignature::default()
        }),
    );
    let argument = LambdaArgument::Literal { expression, function };

    let mut tree = AtomTree::new();
    let wrapper = tree.add(ResolvedAtom::new(expression, AtomKind::Lambda(LambdaAtom::new(argument))));
    let inner = tree.add(ResolvedAtom::new(
        expression,
        AtomKind::Lambda(LambdaAtom::new(argument).with_result_arguments(ResultArgumentsInfo::default())),
    ));
    tree.add_child(wrapper, inner);

    f.completer().complete_all(&mut tree, wrapper).unwrap();
    assert!(tree.get(wrapper).unwrap().completed);
    assert!(tree.get(inner).unwrap().completed);
    let lambda_type = f.store.get_type(expression).unwrap();
    assert_eq!(TypeFormatter::new(&f.types).format(lambda_type), "() -> Unit");
}

#[test]
fn test_lambda_completion_errors() {
    let mut f = Fixture::new();
    let (expression, function) = literal(&mut f);
    let info = ResultArgumentsInfo::default();

    // No descriptor recorded for the function node.
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(
        expression,
        AtomKind::Lambda(
            LambdaAtom::new(LambdaArgument::Literal { expression, function })
                .with_result_arguments(info.clone()),
        ),
    ));
    assert_eq!(
        f.completer().complete_all(&mut tree, id),
        Err(CompletionError::MissingFunctionDescriptor { node: function })
    );

    // Descriptor, but no provisional type for the literal.
    f.store
        .record_function(function, Arc::new(FunctionSignature::default()));
    assert_eq!(
        f.completer().complete_all(&mut tree, id),
        Err(CompletionError::MissingLiteralType { node: expression })
    );

    let other = f.node();
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(
        other,
        AtomKind::Lambda(
            LambdaAtom::new(LambdaArgument::Other { node: other }).with_result_arguments(info),
        ),
    ));
    assert_eq!(
        f.completer().complete_all(&mut tree, id),
        Err(CompletionError::UnexpectedLambdaArgument { node: other })
    );
}

#[test]
fn test_named_function_statement_has_no_expression_type() {
    let mut f = Fixture::new();
    let function = f.node();
    let open = f.types.fresh_var();
    f.substitutor.insert(open, TypeId::DOUBLE);
    let open_ty = f.types.variable(open);
    f.store.record_function(
        function,
        Arc::new(FunctionSignature {
            params: vec![open_ty],
            return_type: Some(TypeId::UNIT),
            ..FunctionSignature::default()
        }),
    );

    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(
        function,
        AtomKind::Lambda(
            LambdaAtom::new(LambdaArgument::AnonymousFunction {
                function,
                named: true,
            })
            .with_result_arguments(ResultArgumentsInfo::default()),
        ),
    ));
    f.completer().complete_all(&mut tree, id).unwrap();

    assert!(f.store.get_type(function).is_none());
    assert_eq!(f.store.function(function).unwrap().params, vec![TypeId::DOUBLE]);
    assert!(tree.get(id).unwrap().completed);
}

fn mismatched_lambda(f: &mut Fixture) -> (AtomTree, AtomId, NodeId) {
    let (expression, function, result) = (f.node(), f.node(), f.node());
    f.store.record_type(expression, TypeId::ERROR);
    f.store.record_type(result, TypeId::INT);
    f.store.record_function(
        function,
        Arc::new(FunctionSignature {
            return_type: Some(TypeId::STRING),
            ..FunctionSignature::default()
        }),
    );
    let lambda = LambdaAtom::new(LambdaArgument::Literal { expression, function })
        .with_return_type(TypeId::STRING)
        .with_result_arguments(ResultArgumentsInfo {
            non_error_arguments: vec![LambdaResultArgument {
                expression: Some(result),
                ty: Some(TypeId::INT),
                data_flow_after: DataFlowInfo::empty(),
            }],
            return_arguments_exist: true,
        });
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(expression, AtomKind::Lambda(lambda)));
    (tree, id, result)
}

#[test]
fn test_return_expression_type_mismatch_is_reported() {
    let mut f = Fixture::new();
    let (mut tree, id, result) = mismatched_lambda(&mut f);
    f.completer().complete_all(&mut tree, id).unwrap();

    let diagnostics = f.sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::TYPE_MISMATCH);
    assert_eq!(diagnostics[0].node, result);
    assert_eq!(
        diagnostics[0].message_text,
        "Type mismatch: inferred type is Int but String was expected"
    );
    assert_eq!(f.store.expected_type(result), Some(TypeId::STRING));
}

#[test]
fn test_type_mismatch_reporting_can_be_disabled() {
    let mut f = Fixture::new();
    let (mut tree, id, result) = mismatched_lambda(&mut f);
    let options = CompletionOptions {
        report_type_mismatch: false,
        ..CompletionOptions::default()
    };
    AtomCompleter::new(f.context().with_options(options), &f.substitutor)
        .complete_all(&mut tree, id)
        .unwrap();

    assert!(f.sink.is_empty());
    assert_eq!(f.store.expected_type(result), Some(TypeId::STRING));
    assert_eq!(f.store.get_type(result), Some(TypeId::INT));
}
