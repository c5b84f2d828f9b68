use proptest::prelude::*;
use pulsec_core::opt::fold;
use pulsec_core::{
    AstNode, AstNodeKind, BinaryOperator, OptimizeErrorKind, Optimizer, UnaryOperator,
};

fn optimize(node: AstNode) -> AstNode {
    Optimizer::new()
        .optimize(node)
        .expect("optimization should succeed")
        .expect("expression should not be eliminated")
}

const ALL_BINARY: [BinaryOperator; 15] = [
    BinaryOperator::ShiftLeft,
    BinaryOperator::ShiftRight,
    BinaryOperator::Add,
    BinaryOperator::Sub,
    BinaryOperator::Mul,
    BinaryOperator::Div,
    BinaryOperator::Mod,
    BinaryOperator::Eq,
    BinaryOperator::Ne,
    BinaryOperator::Gt,
    BinaryOperator::Ge,
    BinaryOperator::Lt,
    BinaryOperator::Le,
    BinaryOperator::Or,
    BinaryOperator::And,
];

/// Reference semantics computed on 32-bit integers and truncated to the
/// 16-bit VM word. `None` for a zero divisor.
fn reference(op: BinaryOperator, a: i16, b: i16) -> Option<i16> {
    let (x, y) = (a as i32, b as i32);
    let r = match op {
        BinaryOperator::ShiftLeft if !(0..48).contains(&y) => 0,
        BinaryOperator::ShiftLeft => ((x as i64) << y) as i32,
        BinaryOperator::ShiftRight if y < 0 => x >> 31,
        BinaryOperator::ShiftRight => x >> y.min(31),
        BinaryOperator::Add => x + y,
        BinaryOperator::Sub => x - y,
        BinaryOperator::Mul => x * y,
        BinaryOperator::Div if y == 0 => return None,
        BinaryOperator::Div => x / y,
        BinaryOperator::Mod if y == 0 => return None,
        BinaryOperator::Mod => x % y,
        BinaryOperator::Eq => (x == y) as i32,
        BinaryOperator::Ne => (x != y) as i32,
        BinaryOperator::Gt => (x > y) as i32,
        BinaryOperator::Ge => (x >= y) as i32,
        BinaryOperator::Lt => (x < y) as i32,
        BinaryOperator::Le => (x <= y) as i32,
        BinaryOperator::Or => (x != 0 || y != 0) as i32,
        BinaryOperator::And => (x != 0 && y != 0) as i32,
    };
    Some(r as i16)
}

#[test]
fn assignment_of_constant_product_folds_to_immediate() {
    // x = 4 * 8;
    let program = AstNode::assignment(
        AstNode::store(3).at(1, 1),
        AstNode::binary(
            BinaryOperator::Mul,
            AstNode::immediate(4).at(1, 5),
            AstNode::immediate(8).at(1, 9),
        )
        .at(1, 7),
    )
    .at(1, 3);

    let optimized = optimize(program);

    let expected = AstNode::assignment(
        AstNode::store(3).at(1, 1),
        AstNode::immediate(32).at(1, 7),
    )
    .at(1, 3);
    assert_eq!(optimized, expected);
}

#[test]
fn nested_constants_fold_bottom_up() {
    // (2 + 3) * (10 - 4) == 30
    let expr = AstNode::binary(
        BinaryOperator::Eq,
        AstNode::binary(
            BinaryOperator::Mul,
            AstNode::binary(BinaryOperator::Add, AstNode::immediate(2), AstNode::immediate(3)),
            AstNode::binary(BinaryOperator::Sub, AstNode::immediate(10), AstNode::immediate(4)),
        ),
        AstNode::immediate(30),
    );
    assert_eq!(optimize(expr).as_immediate(), Some(1));
}

#[test]
fn partially_constant_expression_keeps_its_shape() {
    let expr = AstNode::binary(
        BinaryOperator::Add,
        AstNode::load(7),
        AstNode::binary(BinaryOperator::Add, AstNode::immediate(1), AstNode::immediate(2)),
    );
    let expected = AstNode::binary(BinaryOperator::Add, AstNode::load(7), AstNode::immediate(3));
    assert_eq!(optimize(expr), expected);
}

#[test]
fn logical_operators_fold_without_short_circuit() {
    let or = AstNode::binary(BinaryOperator::Or, AstNode::immediate(0), AstNode::immediate(-4));
    let and = AstNode::binary(BinaryOperator::And, AstNode::immediate(5), AstNode::immediate(0));
    assert_eq!(optimize(or).as_immediate(), Some(1));
    assert_eq!(optimize(and).as_immediate(), Some(0));
}

#[test]
fn constant_division_by_zero_is_an_error() {
    let expr = AstNode::binary(BinaryOperator::Div, AstNode::immediate(1), AstNode::immediate(0)).at(4, 12);
    let err = Optimizer::new().optimize(expr).unwrap_err();
    assert_eq!(err.kind(), &OptimizeErrorKind::DivisionByZero);
    assert_eq!(err.to_string(), "Division by zero. at 4:12");
}

#[test]
fn constant_modulo_by_zero_is_an_error() {
    let expr = AstNode::binary(BinaryOperator::Mod, AstNode::immediate(9), AstNode::immediate(0));
    let err = Optimizer::new().optimize(expr).unwrap_err();
    assert_eq!(err.kind(), &OptimizeErrorKind::DivisionByZero);
}

#[test]
fn division_by_folded_zero_deep_in_a_block_aborts_everything() {
    let program = AstNode::block(vec![
        AstNode::assignment(AstNode::store(0), AstNode::immediate(1)),
        AstNode::assignment(
            AstNode::store(1),
            AstNode::binary(
                BinaryOperator::Div,
                AstNode::load(0),
                AstNode::binary(BinaryOperator::Sub, AstNode::immediate(2), AstNode::immediate(2)),
            )
            .at(2, 9),
        ),
    ]);
    // the divisor folds to 0 but the dividend is not constant: no error
    assert!(Optimizer::new().optimize(program).is_ok());

    let program = AstNode::block(vec![AstNode::assignment(
        AstNode::store(1),
        AstNode::binary(
            BinaryOperator::Div,
            AstNode::immediate(6),
            AstNode::binary(BinaryOperator::Sub, AstNode::immediate(2), AstNode::immediate(2)),
        )
        .at(2, 9),
    )]);
    let err = Optimizer::new().optimize(program).unwrap_err();
    assert_eq!(err.kind(), &OptimizeErrorKind::DivisionByZero);
}

#[test]
fn multiplication_by_power_of_two_becomes_left_shift() {
    let expr = AstNode::binary(BinaryOperator::Mul, AstNode::load(2), AstNode::immediate(8));
    let expected = AstNode::binary(BinaryOperator::ShiftLeft, AstNode::load(2), AstNode::immediate(3));
    assert_eq!(optimize(expr), expected);
}

#[test]
fn division_by_power_of_two_becomes_right_shift() {
    let expr = AstNode::binary(BinaryOperator::Div, AstNode::load(2), AstNode::immediate(16384));
    let expected = AstNode::binary(BinaryOperator::ShiftRight, AstNode::load(2), AstNode::immediate(14));
    assert_eq!(optimize(expr), expected);
}

#[test]
fn strength_reduction_only_applies_to_right_power_of_two_operands() {
    let cases = vec![
        AstNode::binary(BinaryOperator::Mul, AstNode::load(2), AstNode::immediate(6)),
        AstNode::binary(BinaryOperator::Mul, AstNode::load(2), AstNode::immediate(-8)),
        AstNode::binary(BinaryOperator::Mul, AstNode::immediate(8), AstNode::load(2)),
        AstNode::binary(BinaryOperator::Mod, AstNode::load(2), AstNode::immediate(4)),
        AstNode::binary(BinaryOperator::Add, AstNode::load(2), AstNode::immediate(4)),
        AstNode::binary(BinaryOperator::Div, AstNode::load(2), AstNode::immediate(0)),
    ];
    for case in cases {
        assert_eq!(optimize(case.clone()), case);
    }
}

#[test]
fn unary_constants_fold() {
    let neg = AstNode::unary(UnaryOperator::Neg, AstNode::immediate(5));
    let abs = AstNode::unary(UnaryOperator::Abs, AstNode::immediate(-7));
    let neg_min = AstNode::unary(UnaryOperator::Neg, AstNode::immediate(i16::MIN));
    assert_eq!(optimize(neg).as_immediate(), Some(-5));
    assert_eq!(optimize(abs).as_immediate(), Some(7));
    assert_eq!(optimize(neg_min).as_immediate(), Some(i16::MIN));
}

#[test]
fn unary_on_runtime_value_is_kept() {
    let expr = AstNode::unary(
        UnaryOperator::Abs,
        AstNode::binary(BinaryOperator::Mul, AstNode::load(1), AstNode::immediate(2)),
    );
    let expected = AstNode::unary(
        UnaryOperator::Abs,
        AstNode::binary(BinaryOperator::ShiftLeft, AstNode::load(1), AstNode::immediate(1)),
    );
    assert_eq!(optimize(expr), expected);
}

#[test]
fn absolute_value_of_minimum_is_a_range_error() {
    let expr = AstNode::unary(UnaryOperator::Abs, AstNode::immediate(i16::MIN)).at(3, 5);
    let err = Optimizer::new().optimize(expr).unwrap_err();
    assert_eq!(err.kind(), &OptimizeErrorKind::RangeOverflow);
    assert_eq!(
        err.to_string(),
        "-32768 has no positive correspondance in 16 bits integers. at 3:5"
    );
}

#[test]
fn optimizing_twice_changes_nothing() {
    let program = AstNode::block(vec![
        AstNode::assignment(
            AstNode::store(0),
            AstNode::binary(
                BinaryOperator::Div,
                AstNode::binary(BinaryOperator::Add, AstNode::load(1), AstNode::immediate(3)),
                AstNode::immediate(4),
            ),
        ),
        AstNode::block(vec![]),
        AstNode::assignment(
            AstNode::array_write(10, 4, "buf", AstNode::load(2)),
            AstNode::unary(UnaryOperator::Neg, AstNode::immediate(9)),
        ),
        AstNode::emit(1, vec![]),
    ]);

    let once = optimize(program);
    let twice = optimize(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn shifts_past_the_word_width_clear_or_sign_fill() {
    let shl = |a, b| fold::compute_binop(BinaryOperator::ShiftLeft, a, b);
    let shr = |a, b| fold::compute_binop(BinaryOperator::ShiftRight, a, b);
    assert_eq!(shl(1, 15), Some(i16::MIN));
    assert_eq!(shl(1, 16), Some(0));
    assert_eq!(shl(-1, 31), Some(0));
    assert_eq!(shl(3, -1), Some(0));
    assert_eq!(shr(i16::MIN, 15), Some(-1));
    assert_eq!(shr(i16::MIN, 16), Some(-1));
    assert_eq!(shr(i16::MAX, 31), Some(0));
    assert_eq!(shr(-5, -2), Some(-1));
    assert_eq!(shr(12, 2), Some(3));
}

#[test]
fn power_of_two_helpers() {
    assert!(fold::is_power_of_two(1));
    assert!(fold::is_power_of_two(16384));
    assert!(!fold::is_power_of_two(0));
    assert!(!fold::is_power_of_two(-2));
    assert!(!fold::is_power_of_two(12));
    assert_eq!(fold::shift_from_power_of_two(1), 0);
    assert_eq!(fold::shift_from_power_of_two(1024), 10);
}

/// Expressions over constants and memory cells. No division, no `abs` and
/// only in-range or runtime array indices, so the first pass cannot fail.
fn expression() -> impl Strategy<Value = AstNode> {
    let leaf = prop_oneof![
        any::<i16>().prop_map(AstNode::immediate),
        (0usize..8).prop_map(AstNode::load),
        (0i16..6).prop_map(|i| AstNode::array_read(32, 4, "cells", AstNode::immediate(i % 4))),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        let ops = prop::sample::select(vec![
            BinaryOperator::ShiftLeft,
            BinaryOperator::ShiftRight,
            BinaryOperator::Add,
            BinaryOperator::Sub,
            BinaryOperator::Mul,
            BinaryOperator::Eq,
            BinaryOperator::Lt,
            BinaryOperator::Or,
            BinaryOperator::And,
        ]);
        prop_oneof![
            (ops, inner.clone(), inner.clone()).prop_map(|(op, l, r)| AstNode::binary(op, l, r)),
            inner.clone().prop_map(|e| AstNode::unary(UnaryOperator::Neg, e)),
            inner.prop_map(|e| {
                let index = AstNode::binary(BinaryOperator::Add, AstNode::load(1), e);
                AstNode::array_read(32, 4, "cells", index)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn optimizing_generated_expressions_twice_changes_nothing(expr in expression()) {
        let program = AstNode::assignment(AstNode::store(0), expr);
        let once = optimize(program);
        let twice = optimize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn folding_matches_direct_evaluation(a in any::<i16>(), b in any::<i16>(), which in 0usize..15) {
        let op = ALL_BINARY[which];
        let expr = AstNode::binary(op, AstNode::immediate(a), AstNode::immediate(b));
        let result = Optimizer::new().optimize(expr);
        match reference(op, a, b) {
            Some(expected) => {
                let folded = result.unwrap().unwrap();
                prop_assert_eq!(folded.as_immediate(), Some(expected));
            }
            None => {
                let err = result.unwrap_err();
                prop_assert_eq!(err.kind(), &OptimizeErrorKind::DivisionByZero);
            }
        }
    }

    #[test]
    fn left_shift_reduction_preserves_products(a in any::<i16>(), k in 0i16..15) {
        let b = 1i16 << k;
        let expr = AstNode::binary(BinaryOperator::Mul, AstNode::load(0), AstNode::immediate(b));
        let AstNodeKind::BinaryArithmetic { op, right, .. } = optimize(expr).kind else {
            panic!("expected a binary node");
        };
        prop_assert_eq!(op, BinaryOperator::ShiftLeft);
        let shift = right.as_immediate().unwrap();
        prop_assert_eq!(fold::compute_binop(op, a, shift), Some(a.wrapping_mul(b)));
    }

    #[test]
    fn right_shift_reduction_preserves_quotients(a in 0i16..=i16::MAX, k in 0i16..15) {
        let b = 1i16 << k;
        let expr = AstNode::binary(BinaryOperator::Div, AstNode::load(0), AstNode::immediate(b));
        let AstNodeKind::BinaryArithmetic { op, right, .. } = optimize(expr).kind else {
            panic!("expected a binary node");
        };
        prop_assert_eq!(op, BinaryOperator::ShiftRight);
        let shift = right.as_immediate().unwrap();
        prop_assert_eq!(fold::compute_binop(op, a, shift), Some(a / b));
    }
}
