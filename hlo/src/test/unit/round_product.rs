//! Round-product pass tests: structure, type preservation, idempotence.

use crate::prelude::*;
use crate::test::{f32_product_graph, root_of};

fn count_kind(graph: &Graph, kind: OpcodeKind) -> usize {
    graph.nodes().filter(|node| node.opcode().kind() == kind).count()
}

#[test]
fn wraps_multiply_with_round_and_convert() {
    let (mut graph, product) = f32_product_graph();
    let original_shape = graph.get(product).unwrap().shape().clone();

    let changed = RoundProduct.run(&mut graph).unwrap();
    assert!(changed);

    // Root moved to the convert, whose operand chain is round(multiply).
    let root = root_of(&graph);
    assert_ne!(root, product);
    let convert = graph.get(root).unwrap();
    assert_eq!(convert.opcode().kind(), OpcodeKind::Convert);
    let rounded = graph.get(convert.operands()[0]).unwrap();
    assert_eq!(rounded.opcode().kind(), OpcodeKind::RoundNearestInt);
    assert_eq!(rounded.operands(), [product]);

    // Type preservation: the externally visible shape is untouched.
    assert_eq!(*convert.shape(), original_shape);

    // The multiply's only remaining user is the rounding node.
    let users: Vec<NodeId> = graph.get(product).unwrap().users().iter().copied().collect();
    assert_eq!(users, [rounded.id()]);

    assert_eq!(graph.len(), 5);
    graph.verify().unwrap();
}

#[test]
fn second_run_changes_nothing() {
    let (mut graph, _) = f32_product_graph();
    assert!(RoundProduct.run(&mut graph).unwrap());

    let rendered = graph.to_text();
    let changed = RoundProduct.run(&mut graph).unwrap();
    assert!(!changed);
    assert_eq!(graph.to_text(), rendered, "second run must leave the graph structurally identical");
}

#[test]
fn graph_without_multiply_is_untouched() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::F32);
    let a = graph.insert(HloOpcode::Parameter { index: 0 }, [], shape.clone()).unwrap();
    let b = graph.insert(HloOpcode::Parameter { index: 1 }, [], shape.clone()).unwrap();
    let sum = graph.insert(HloOpcode::Add, [a, b], shape).unwrap();
    graph.set_root(sum).unwrap();
    let rendered = graph.to_text();

    let changed = RoundProduct.run(&mut graph).unwrap();
    assert!(!changed);
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.to_text(), rendered);
}

#[test]
fn integer_multiply_is_not_rewritten() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::S32);
    let a = graph.insert(HloOpcode::Parameter { index: 0 }, [], shape.clone()).unwrap();
    let b = graph.insert(HloOpcode::Parameter { index: 1 }, [], shape.clone()).unwrap();
    let product = graph.insert(HloOpcode::Multiply, [a, b], shape).unwrap();
    graph.set_root(product).unwrap();

    assert!(!RoundProduct.run(&mut graph).unwrap());
    assert_eq!(graph.len(), 3);
}

#[test]
fn chained_multiplies_are_rewritten_independently() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::F32);
    let a = graph.insert(HloOpcode::Parameter { index: 0 }, [], shape.clone()).unwrap();
    let b = graph.insert(HloOpcode::Parameter { index: 1 }, [], shape.clone()).unwrap();
    let c = graph.insert(HloOpcode::Parameter { index: 2 }, [], shape.clone()).unwrap();
    let inner = graph.insert(HloOpcode::Multiply, [a, b], shape.clone()).unwrap();
    let outer = graph.insert(HloOpcode::Multiply, [inner, c], shape).unwrap();
    graph.set_root(outer).unwrap();

    assert!(RoundProduct.run(&mut graph).unwrap());
    assert_eq!(count_kind(&graph, OpcodeKind::RoundNearestInt), 2);
    assert_eq!(count_kind(&graph, OpcodeKind::Convert), 2);

    // The outer multiply now consumes the inner product's converted value.
    let outer_operands = graph.get(outer).unwrap().operands();
    assert_eq!(graph.get(outer_operands[0]).unwrap().opcode().kind(), OpcodeKind::Convert);

    assert!(!RoundProduct.run(&mut graph).unwrap());
    graph.verify().unwrap();
}

#[test]
fn all_outside_consumers_are_redirected() {
    let (mut graph, product) = f32_product_graph();
    let shape = Shape::scalar(ElementType::F32);
    let negate = graph.insert(HloOpcode::Negate, [product], shape.clone()).unwrap();
    let sum = graph.insert(HloOpcode::Add, [negate, product], shape).unwrap();
    graph.set_root(sum).unwrap();

    assert!(RoundProduct.run(&mut graph).unwrap());

    let product_users: Vec<OpcodeKind> = graph
        .get(product)
        .unwrap()
        .users()
        .iter()
        .map(|&id| graph.get(id).unwrap().opcode().kind())
        .collect();
    assert_eq!(product_users, [OpcodeKind::RoundNearestInt]);

    // Both former consumers now read the converted value.
    let negate_src = graph.get(negate).unwrap().operands()[0];
    assert_eq!(graph.get(negate_src).unwrap().opcode().kind(), OpcodeKind::Convert);
    let sum_operands = graph.get(sum).unwrap().operands();
    assert_eq!(sum_operands[1], negate_src);
    graph.verify().unwrap();
}

#[test]
fn root_multiply_updates_the_root_pointer() {
    let (mut graph, product) = f32_product_graph();
    assert_eq!(graph.root(), Some(product));

    RoundProduct.run(&mut graph).unwrap();
    let root = root_of(&graph);
    assert_ne!(root, product);
    assert_eq!(graph.get(root).unwrap().opcode().kind(), OpcodeKind::Convert);
    graph.verify().unwrap();
}

#[test]
fn f64_multiplies_are_also_rewritten() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::F64);
    let a = graph.insert(HloOpcode::Parameter { index: 0 }, [], shape.clone()).unwrap();
    let b = graph.insert(HloOpcode::Parameter { index: 1 }, [], shape.clone()).unwrap();
    let product = graph.insert(HloOpcode::Multiply, [a, b], shape).unwrap();
    graph.set_root(product).unwrap();

    assert!(RoundProduct.run(&mut graph).unwrap());
    assert_eq!(count_kind(&graph, OpcodeKind::RoundNearestInt), 1);
}

#[test]
fn pass_name_shows_up_in_errors() {
    assert_eq!(RoundProduct.name(), "round-product");
}
