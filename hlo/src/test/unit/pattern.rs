//! Pattern matcher tests.

use crate::prelude::*;
use crate::test::f32_product_graph;

#[test]
fn multiply_pattern_captures_operands() {
    let (graph, product) = f32_product_graph();
    let [a, b] = graph.get(product).unwrap().operands() else {
        panic!("multiply has two operands");
    };

    let pat = Pat::multiply(Pat::float_var("a"), Pat::float_var("b"));
    let bindings = pat.matches(&graph, product).unwrap();
    assert_eq!(bindings.get("a"), Some(*a));
    assert_eq!(bindings.get("b"), Some(*b));
    assert_eq!(bindings.len(), 2);
}

#[test]
fn float_filter_rejects_integer_multiply() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::S32);
    let a = graph.insert(HloOpcode::Parameter { index: 0 }, [], shape.clone()).unwrap();
    let b = graph.insert(HloOpcode::Parameter { index: 1 }, [], shape.clone()).unwrap();
    let product = graph.insert(HloOpcode::Multiply, [a, b], shape).unwrap();
    graph.set_root(product).unwrap();

    let pat = Pat::multiply(Pat::float_var("a"), Pat::float_var("b"));
    assert!(pat.matches(&graph, product).is_none());

    // Without the element constraint the same structure matches.
    assert!(Pat::multiply(Pat::var("a"), Pat::var("b")).matches(&graph, product).is_some());
}

#[test]
fn wildcard_matches_any_node() {
    let (graph, product) = f32_product_graph();
    for id in graph.ids() {
        assert!(Pat::any().matches(&graph, id).is_some());
    }
    let bindings = Pat::var("n").matches(&graph, product).unwrap();
    assert_eq!(bindings.get("n"), Some(product));
}

#[test]
fn nested_pattern_matches_operand_chain() {
    let (mut graph, product) = f32_product_graph();
    let shape = Shape::scalar(ElementType::F32);
    let rounded = graph.insert(HloOpcode::RoundNearestInt, [product], shape.clone()).unwrap();
    let converted = graph.insert(HloOpcode::Convert, [rounded], shape).unwrap();

    let pat = Pat::convert(Pat::round_nearest_int(Pat::multiply(Pat::any(), Pat::any()).named("m")));
    let bindings = pat.matches(&graph, converted).unwrap();
    assert_eq!(bindings.get("m"), Some(product));

    // The same pattern does not match partway down the chain.
    assert!(pat.matches(&graph, rounded).is_none());
}

#[test]
fn repeated_capture_name_requires_same_node() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::F32);
    let a = graph.insert(HloOpcode::Parameter { index: 0 }, [], shape.clone()).unwrap();
    let b = graph.insert(HloOpcode::Parameter { index: 1 }, [], shape.clone()).unwrap();
    let square = graph.insert(HloOpcode::Multiply, [a, a], shape.clone()).unwrap();
    let product = graph.insert(HloOpcode::Multiply, [a, b], shape).unwrap();
    graph.set_root(product).unwrap();

    let square_pat = Pat::multiply(Pat::var("x"), Pat::var("x"));
    assert!(square_pat.matches(&graph, square).is_some());
    assert!(square_pat.matches(&graph, product).is_none());
}

#[test]
fn operand_count_mismatch_fails_the_match() {
    let (graph, product) = f32_product_graph();
    let unary_multiply = Pat::op(OpcodeKind::Multiply, vec![Pat::any()]);
    assert!(unary_multiply.matches(&graph, product).is_none());
}

#[test]
fn opcode_mismatch_fails_the_match() {
    let (graph, product) = f32_product_graph();
    let pat = Pat::add(Pat::any(), Pat::any());
    assert!(pat.matches(&graph, product).is_none());
}
