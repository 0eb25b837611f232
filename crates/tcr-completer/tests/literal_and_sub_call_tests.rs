mod common;

use common::{Fixture, TableTyping};
use std::sync::Arc;
use tcr_completer::*;
use tcr_solver::{FunctionShape, TypeDatabase, TypeId};

#[test]
fn test_collection_literal_retyped_against_solved_expected_type() {
    let mut f = Fixture::new();
    let (list, _) = f.list_class();
    let (literal, subject) = (f.node(), f.node());
    let v = f.types.fresh_var();
    f.substitutor.insert(v, TypeId::INT);
    let list_v = f.types.class_type(list, &[f.types.variable(v)]);
    let list_int = f.types.class_type(list, &[TypeId::INT]);

    let flow = DataFlowInfo::empty().with_fact(subject, TypeId::STRING);
    let outer_context = ExpressionContext::new(ExpectedType::Type(TypeId::ANY))
        .replace_data_flow(flow.clone())
        .replace_context_dependency(ContextDependency::Dependent);
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(
        literal,
        AtomKind::CollectionLiteral(CollectionLiteralAtom {
            expression: literal,
            expected_type: Some(list_v),
            outer_context,
        }),
    ));

    let typing = TableTyping {
        types: vec![(literal, list_int)],
        ..TableTyping::default()
    };
    let collaborators = Collaborators {
        typing: &typing,
        ..f.collaborators()
    };
    f.completer_with(collaborators)
        .complete_all(&mut tree, id)
        .unwrap();

    let requests = typing.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (node, context) = &requests[0];
    assert_eq!(*node, literal);
    assert_eq!(context.expected_type, ExpectedType::Type(list_int));
    assert_eq!(context.dependency, ContextDependency::Independent);
    assert_eq!(context.data_flow, flow);

    assert_eq!(f.store.expected_type(literal), Some(list_int));
    let info = f.store.expression_type_info(literal).unwrap();
    assert_eq!(info.ty, Some(list_int));
    assert_eq!(info.data_flow, flow);
    assert!(tree.get(id).unwrap().completed);
}

#[test]
fn test_collection_literal_without_expected_type() {
    let mut f = Fixture::new();
    let literal = f.node();
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(
        literal,
        AtomKind::CollectionLiteral(CollectionLiteralAtom {
            expression: literal,
            expected_type: None,
            outer_context: ExpressionContext::default(),
        }),
    ));

    let typing = TableTyping::default();
    let collaborators = Collaborators {
        typing: &typing,
        ..f.collaborators()
    };
    f.completer_with(collaborators)
        .complete_all(&mut tree, id)
        .unwrap();

    let requests = typing.requests.lock().unwrap();
    assert_eq!(requests[0].1.expected_type, ExpectedType::NoExpectedType);
    assert!(f.store.expected_type(literal).is_none());
    assert_eq!(f.store.expression_type_info(literal).unwrap().ty, None);
}

#[test]
fn test_sub_call_argument_keeps_recorded_type() {
    let mut f = Fixture::new();
    let argument = f.node();
    f.store.record_type(argument, TypeId::LONG);
    let mut tree = AtomTree::new();
    let id = tree.add(f.sub_call_atom(argument));

    let context = f
        .context()
        .with_call_context(ExpressionContext::new(ExpectedType::Type(TypeId::STRING)));
    AtomCompleter::new(context, &f.substitutor)
        .complete_all(&mut tree, id)
        .unwrap();

    assert_eq!(f.store.get_type(argument), Some(TypeId::LONG));
    assert!(f.store.expected_type(argument).is_none());
    assert!(f.sink.is_empty());
    assert!(tree.get(id).unwrap().completed);
}

#[test]
fn test_sub_call_argument_typed_on_demand() {
    let mut f = Fixture::new();
    let argument = f.node();
    let mut tree = AtomTree::new();
    let id = tree.add(f.sub_call_atom(argument));

    let typing = TableTyping {
        types: vec![(argument, TypeId::DOUBLE)],
        ..TableTyping::default()
    };
    let collaborators = Collaborators {
        typing: &typing,
        ..f.collaborators()
    };
    f.completer_with(collaborators)
        .complete_all(&mut tree, id)
        .unwrap();

    let requests = typing.requests.lock().unwrap();
    assert_eq!(requests[0].1.expected_type, ExpectedType::NoExpectedType);
    assert_eq!(f.store.get_type(argument), Some(TypeId::DOUBLE));
}

#[test]
fn test_sub_call_argument_without_expression_is_completed() {
    let mut f = Fixture::new();
    let node = f.node();
    let mut tree = AtomTree::new();
    let id = tree.add(ResolvedAtom::new(
        node,
        AtomKind::SubCallArgument(SubCallArgumentAtom { expression: None }),
    ));
    f.completer().complete_all(&mut tree, id).unwrap();
    assert!(tree.get(id).unwrap().completed);
    assert!(f.store.expression_type_info(node).is_none());
}

#[test]
fn test_call_with_lambda_and_literal_arguments() {
    // foo(listOf(1), { x -> x }) with every atom kind below one call
    let mut f = Fixture::new();
    let (call, callee, sub_call, expression, function, result) =
        (f.node(), f.node(), f.node(), f.node(), f.node(), f.node());
    f.store.record_type(sub_call, TypeId::INT);
    f.store.record_type(expression, TypeId::ERROR);
    f.store.record_type(result, TypeId::INT);
    f.store.record_function(
        function,
        Arc::new(FunctionSignature {
            params: vec![TypeId::INT],
            return_type: Some(TypeId::INT),
            ..FunctionSignature::default()
        }),
    );

    let int_to_int = f.types.function(FunctionShape::new([TypeId::INT], TypeId::INT));
    let descriptor = Arc::new(CallableDescriptor::function(
        f.name("foo"),
        vec![
            ValueParameter::new(f.name("a"), TypeId::INT),
            ValueParameter::new(f.name("b"), int_to_int),
        ],
        TypeId::UNIT,
    ));
    let candidate = Candidate::new(descriptor)
        .with_argument(0, ResolvedCallArgument::Simple(CallArgument::Expression { node: sub_call }))
        .with_argument(1, ResolvedCallArgument::Simple(CallArgument::Expression { node: expression }));

    let mut tree = AtomTree::new();
    let root = tree.add(f.call_atom(call, callee, candidate));
    let sub_call_id = tree.add(f.sub_call_atom(sub_call));
    let lambda_id = tree.add(ResolvedAtom::new(
        expression,
        AtomKind::Lambda(
            LambdaAtom::new(LambdaArgument::Literal { expression, function })
                .with_parameters(vec![TypeId::INT])
                .with_return_type(TypeId::INT)
                .with_result_arguments(ResultArgumentsInfo {
                    non_error_arguments: vec![LambdaResultArgument {
                        expression: Some(result),
                        ty: Some(TypeId::INT),
                        data_flow_after: DataFlowInfo::empty(),
                    }],
                    return_arguments_exist: true,
                }),
        ),
    ));
    tree.add_child(root, sub_call_id);
    tree.add_child(root, lambda_id);

    let resolved = f
        .completer()
        .complete_top_level(&mut tree, root, Vec::new())
        .unwrap()
        .unwrap();

    assert_eq!(resolved.status, ResolutionStatus::Success);
    assert_eq!(resolved.value_arguments.len(), 2);
    assert!(tree.iter().all(|(_, atom)| atom.completed));
    assert_eq!(f.store.get_type(expression), Some(int_to_int));
    assert_eq!(f.store.expected_type(result), Some(TypeId::INT));
    assert!(f.sink.is_empty());
}
