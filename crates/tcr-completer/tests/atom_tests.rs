use super::*;

fn lambda_atom(tree: &mut AtomTree, node: u32, with_body: bool) -> AtomId {
    let mut lambda = LambdaAtom::new(LambdaArgument::Literal {
        expression: NodeId(node),
        function: NodeId(node + 1),
    });
    if with_body {
        lambda = lambda.with_result_arguments(ResultArgumentsInfo::default());
    }
    tree.add(ResolvedAtom::new(NodeId(node), AtomKind::Lambda(lambda)))
}

#[test]
fn test_add_and_children_keep_order() {
    let mut tree = AtomTree::new();
    let root = tree.add(ResolvedAtom::new(
        NodeId(0),
        AtomKind::SubCallArgument(SubCallArgumentAtom { expression: None }),
    ));
    let a = lambda_atom(&mut tree, 10, true);
    let b = lambda_atom(&mut tree, 20, true);
    tree.add_child(root, a);
    tree.add_child(root, b);

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.children(root).as_slice(), &[a, b]);
    assert!(tree.get(root).unwrap().analyzed);
    assert!(!tree.get(root).unwrap().completed);
}

#[test]
fn test_unwrap_lambda_follows_wrappers() {
    let mut tree = AtomTree::new();
    let outer = lambda_atom(&mut tree, 0, false);
    let middle = lambda_atom(&mut tree, 10, false);
    let inner = lambda_atom(&mut tree, 20, true);
    tree.add_child(outer, middle);
    tree.add_child(middle, inner);

    assert_eq!(tree.unwrap_lambda(outer), inner);
    assert_eq!(tree.unwrap_lambda(inner), inner);
}

#[test]
fn test_unwrap_lambda_stops_without_single_lambda_child() {
    let mut tree = AtomTree::new();
    let outer = lambda_atom(&mut tree, 0, false);
    assert_eq!(tree.unwrap_lambda(outer), outer);

    let a = lambda_atom(&mut tree, 10, true);
    let b = lambda_atom(&mut tree, 20, true);
    tree.add_child(outer, a);
    tree.add_child(outer, b);
    assert_eq!(tree.unwrap_lambda(outer), outer);
}

#[test]
fn test_resolution_context_key_for_invoke() {
    let call = CallSite::new(NodeId(5), NodeId(6)).with_kind(CallSiteKind::Invoke {
        base_call: NodeId(2),
    });
    assert_eq!(call.resolution_context_key(), NodeId(2));
    assert_eq!(CallSite::new(NodeId(5), NodeId(6)).resolution_context_key(), NodeId(5));
}
