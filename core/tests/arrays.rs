use pulsec_core::{AstNode, BinaryOperator, OptimizeErrorKind, Optimizer, PulseErrorExt};

fn optimize(node: AstNode) -> AstNode {
    Optimizer::new().optimize(node).unwrap().unwrap()
}

#[test]
fn constant_read_becomes_load() {
    let read = AstNode::array_read(20, 5, "arr", AstNode::immediate(3)).at(1, 5);
    assert_eq!(optimize(read), AstNode::load(23).at(1, 5));
}

#[test]
fn constant_write_becomes_store() {
    let statement = AstNode::assignment(
        AstNode::array_write(20, 5, "arr", AstNode::immediate(0)),
        AstNode::immediate(7),
    );
    let expected = AstNode::assignment(AstNode::store(20), AstNode::immediate(7));
    assert_eq!(optimize(statement), expected);
}

#[test]
fn folded_index_is_resolved_statically() {
    let read = AstNode::array_read(
        100,
        8,
        "samples",
        AstNode::binary(BinaryOperator::Mul, AstNode::immediate(3), AstNode::immediate(2)),
    );
    assert_eq!(optimize(read), AstNode::load(106));
}

#[test]
fn every_index_inside_bounds_is_accepted() {
    for i in 0..5 {
        assert_eq!(
            optimize(AstNode::array_read(40, 5, "arr", AstNode::immediate(i))),
            AstNode::load(40 + i as usize)
        );
        assert_eq!(
            optimize(AstNode::array_write(40, 5, "arr", AstNode::immediate(i))),
            AstNode::store(40 + i as usize)
        );
    }
}

#[test]
fn read_past_the_end_names_array_index_and_size() {
    // arr[10] with arr of size 5
    let read = AstNode::array_read(20, 5, "arr", AstNode::immediate(10)).at(3, 9);
    let err = Optimizer::new().optimize(read).unwrap_err();
    assert_eq!(
        err.kind(),
        &OptimizeErrorKind::ArrayIndexOutOfBounds { array: "arr".to_string(), index: 10, size: 5 }
    );
    assert_eq!(
        err.message(),
        "Out of bound static array access. Trying to read index 10 of array arr of size 5"
    );
    assert_eq!(err.location().map(|l| (l.line, l.column)), Some((3, 9)));
}

#[test]
fn write_at_size_is_out_of_bounds() {
    let write = AstNode::array_write(20, 5, "arr", AstNode::immediate(5));
    let err = Optimizer::new().optimize(write).unwrap_err();
    assert_eq!(
        err.kind(),
        &OptimizeErrorKind::ArrayIndexOutOfBounds { array: "arr".to_string(), index: 5, size: 5 }
    );
    assert!(err.message().contains("Trying to write index 5"));
}

#[test]
fn negative_index_is_out_of_bounds() {
    let read = AstNode::array_read(
        20,
        5,
        "arr",
        AstNode::unary(pulsec_core::UnaryOperator::Neg, AstNode::immediate(1)),
    );
    let err = Optimizer::new().optimize(read).unwrap_err();
    assert_eq!(
        err.kind(),
        &OptimizeErrorKind::ArrayIndexOutOfBounds { array: "arr".to_string(), index: -1, size: 5 }
    );
}

#[test]
fn negative_write_index_is_out_of_bounds() {
    let write = AstNode::array_write(20, 5, "arr", AstNode::immediate(-1)).at(6, 2);
    let err = Optimizer::new().optimize(write).unwrap_err();
    assert_eq!(
        err.kind(),
        &OptimizeErrorKind::ArrayIndexOutOfBounds { array: "arr".to_string(), index: -1, size: 5 }
    );
    assert_eq!(
        err.message(),
        "Out of bound static array access. Trying to write index -1 of array arr of size 5"
    );
}

#[test]
fn runtime_index_keeps_the_array_access() {
    let read = AstNode::array_read(
        20,
        5,
        "arr",
        AstNode::binary(BinaryOperator::Div, AstNode::load(3), AstNode::immediate(2)),
    );
    let expected = AstNode::array_read(
        20,
        5,
        "arr",
        AstNode::binary(BinaryOperator::ShiftRight, AstNode::load(3), AstNode::immediate(1)),
    );
    let optimized = optimize(read);
    assert_eq!(optimized, expected);
    assert!(optimized.is_emittable());
}
