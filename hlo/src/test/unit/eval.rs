//! Evaluator tests and the end-to-end acceptance scenarios: after the pass,
//! a float product evaluates to the nearest integer of the true product.

use test_case::test_case;

use crate::error::Error;
use crate::eval::evaluate;
use crate::prelude::*;
use crate::test::f32_product_graph;

#[test]
fn evaluates_constant_arithmetic() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::S32);
    let two = graph.insert(HloOpcode::Constant(Literal::s32(2)), [], shape.clone()).unwrap();
    let three = graph.insert(HloOpcode::Constant(Literal::s32(3)), [], shape.clone()).unwrap();
    let product = graph.insert(HloOpcode::Multiply, [two, three], shape).unwrap();
    graph.set_root(product).unwrap();

    let result = evaluate(&graph, &[]).unwrap();
    assert_eq!(result.value(), ScalarValue::Int(6));
    assert_eq!(result.element_type(), ElementType::S32);
}

#[test]
fn convert_narrows_to_the_target_type() {
    let mut graph = Graph::new();
    let c = graph
        .insert(HloOpcode::Constant(Literal::f32(2.7)), [], Shape::scalar(ElementType::F32))
        .unwrap();
    let converted = graph.insert(HloOpcode::Convert, [c], Shape::scalar(ElementType::S32)).unwrap();
    graph.set_root(converted).unwrap();

    // Plain convert truncates toward zero; rounding is a separate op.
    assert_eq!(evaluate(&graph, &[]).unwrap().value(), ScalarValue::Int(2));
}

#[test]
fn missing_argument_is_an_error() {
    let (graph, _) = f32_product_graph();
    let err = evaluate(&graph, &[Literal::f32(1.0)]).unwrap_err();
    assert_eq!(err, Error::MissingArgument { index: 1 });
}

#[test]
fn argument_type_mismatch_is_an_error() {
    let (graph, _) = f32_product_graph();
    let err = evaluate(&graph, &[Literal::f32(1.0), Literal::f64(2.0)]).unwrap_err();
    assert_eq!(
        err,
        Error::ArgumentTypeMismatch { index: 1, expected: ElementType::F32, actual: ElementType::F64 }
    );
}

/// Build `a * b` over f32 parameters, run the pass, and evaluate.
fn rounded_product(a: f32, b: f32) -> f64 {
    let (mut graph, _) = f32_product_graph();
    assert!(RoundProduct.run(&mut graph).unwrap());
    graph.verify().unwrap();
    evaluate(&graph, &[Literal::f32(a), Literal::f32(b)]).unwrap().value().to_f64()
}

// The reference scenarios: the multiply now behaves like round(a * b).
#[test_case(1.0, 4.0 => 4.0 ; "already integral product")]
#[test_case(1.5, 1.5 => 2.0 ; "fractional product rounds down")]
#[test_case(10.7, 3.6 => 39.0 ; "fractional product rounds up")]
#[test_case(1.25, 2.0 => 3.0 ; "exact tie rounds away from zero")]
#[test_case(-1.25, 2.0 => -3.0 ; "negative tie rounds away from zero")]
#[test_case(-1.5, 1.0 => -2.0)]
fn acceptance(a: f32, b: f32) -> f64 {
    rounded_product(a, b)
}

#[test]
fn unrewritten_product_stays_fractional() {
    // Sanity contrast: without the pass, 10.7 * 3.6 is not an integer.
    let (graph, _) = f32_product_graph();
    let raw = evaluate(&graph, &[Literal::f32(10.7), Literal::f32(3.6)]).unwrap().value().to_f64();
    assert_ne!(raw, 39.0);
    assert!((raw - 38.52).abs() < 1e-4);
}

#[test]
fn chained_products_round_at_each_site() {
    let mut graph = Graph::new();
    let shape = Shape::scalar(ElementType::F32);
    let two_a = graph.insert(HloOpcode::Constant(Literal::f32(2.0)), [], shape.clone()).unwrap();
    let two_b = graph.insert(HloOpcode::Constant(Literal::f32(2.0)), [], shape.clone()).unwrap();
    let three = graph.insert(HloOpcode::Constant(Literal::f32(3.0)), [], shape.clone()).unwrap();
    let inner = graph.insert(HloOpcode::Multiply, [two_a, two_b], shape.clone()).unwrap();
    let outer = graph.insert(HloOpcode::Multiply, [inner, three], shape).unwrap();
    graph.set_root(outer).unwrap();

    assert!(RoundProduct.run(&mut graph).unwrap());
    assert_eq!(evaluate(&graph, &[]).unwrap().value().to_f64(), 12.0);
}

#[test]
fn second_run_keeps_the_value() {
    let (mut graph, _) = f32_product_graph();
    assert!(RoundProduct.run(&mut graph).unwrap());
    assert!(!RoundProduct.run(&mut graph).unwrap());
    let value = evaluate(&graph, &[Literal::f32(1.5), Literal::f32(1.5)]).unwrap().value().to_f64();
    assert_eq!(value, 2.0);
}

#[test]
fn nan_propagates_through_the_rewritten_graph() {
    let (mut graph, _) = f32_product_graph();
    RoundProduct.run(&mut graph).unwrap();
    let result = evaluate(&graph, &[Literal::f32(f32::NAN), Literal::f32(1.0)]).unwrap();
    let ScalarValue::Float(v) = result.value() else {
        panic!("expected a float result");
    };
    assert!(v.is_nan());
}
