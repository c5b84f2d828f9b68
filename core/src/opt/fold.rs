//! file: core/src/opt/fold.rs
//! description: compile-time arithmetic on 16-bit immediates.
//!
//! Everything here follows the VM word: 16-bit two's complement with
//! wrapping. Shifts are computed wide and truncated, so a count outside
//! 0..=15 (negative included) shifts every bit out: `<<` gives 0 and `>>`
//! gives the sign. Comparisons and logical operators produce 1 or 0, and
//! both logical operands are always evaluated.
//!
use crate::ast::{BinaryOperator, UnaryOperator};

/// Compute `a op b`. Returns `None` when the divisor of `/` or `%` is zero.
pub fn compute_binop(op: BinaryOperator, a: i16, b: i16) -> Option<i16> {
    let result = match op {
        BinaryOperator::ShiftLeft => match shift_count(b) {
            Some(n) => ((a as i32) << n) as i16,
            None => 0,
        },
        BinaryOperator::ShiftRight => match shift_count(b) {
            Some(n) => a >> n,
            None => a >> 15,
        },
        BinaryOperator::Add => a.wrapping_add(b),
        BinaryOperator::Sub => a.wrapping_sub(b),
        BinaryOperator::Mul => a.wrapping_mul(b),
        BinaryOperator::Div => {
            if b == 0 {
                return None;
            }
            a.wrapping_div(b)
        }
        BinaryOperator::Mod => {
            if b == 0 {
                return None;
            }
            a.wrapping_rem(b)
        }
        BinaryOperator::Eq => (a == b) as i16,
        BinaryOperator::Ne => (a != b) as i16,
        BinaryOperator::Gt => (a > b) as i16,
        BinaryOperator::Ge => (a >= b) as i16,
        BinaryOperator::Lt => (a < b) as i16,
        BinaryOperator::Le => (a <= b) as i16,
        BinaryOperator::Or => (a != 0 || b != 0) as i16,
        BinaryOperator::And => (a != 0 && b != 0) as i16,
    };
    Some(result)
}

fn shift_count(b: i16) -> Option<u32> {
    u32::try_from(b).ok().filter(|n| *n < 16)
}

/// Compute `op a`. Returns `None` for `abs(-32768)`, which has no 16-bit result.
pub fn compute_unop(op: UnaryOperator, a: i16) -> Option<i16> {
    match op {
        UnaryOperator::Neg => Some(a.wrapping_neg()),
        UnaryOperator::Abs => a.checked_abs(),
    }
}

/// True for the positive powers of two representable in 16 bits, 1 included.
pub fn is_power_of_two(value: i16) -> bool {
    value > 0 && (value & (value - 1)) == 0
}

/// Base-2 logarithm of a value accepted by [`is_power_of_two`].
pub fn shift_from_power_of_two(value: i16) -> i16 {
    debug_assert!(is_power_of_two(value));
    value.trailing_zeros() as i16
}

/// Strength-reduced replacement for `x op value`, if one exists.
pub fn reduce_strength(op: BinaryOperator, value: i16) -> Option<(BinaryOperator, i16)> {
    if !is_power_of_two(value) {
        return None;
    }
    match op {
        BinaryOperator::Mul => Some((BinaryOperator::ShiftLeft, shift_from_power_of_two(value))),
        BinaryOperator::Div => Some((BinaryOperator::ShiftRight, shift_from_power_of_two(value))),
        _ => None,
    }
}
