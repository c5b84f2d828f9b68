//! file: core/src/opt/expr.rs
//! description: rewrite rules for arithmetic and array access.
//!
use crate::ast::{AstNode, AstNodeKind, BinaryOperator, UnaryOperator};
use crate::location::Location;

use super::{OptimizeError, Optimizer, fold};

const BINARY: &str = "pulsec.opt.binary";
const UNARY: &str = "pulsec.opt.unary";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Access {
    Read,
    Write,
}

impl Access {
    fn verb(&self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
        }
    }

    fn issuer(&self) -> &'static str {
        match self {
            Access::Read => "pulsec.opt.array_read",
            Access::Write => "pulsec.opt.array_write",
        }
    }
}

/// Array metadata resolved by the front end; never modified here.
pub(super) struct ArrayRef {
    pub addr: usize,
    pub size: usize,
    pub name: String,
}

impl Optimizer {
    pub(super) fn optimize_binary(
        &mut self,
        op: BinaryOperator,
        left: AstNode,
        right: AstNode,
        location: Option<Location>,
    ) -> Result<AstNode, OptimizeError> {
        let left = self.optimize_operand(left, "left operand")?;
        let mut right = self.optimize_operand(right, "right operand")?;

        if let (Some(a), Some(b)) = (left.as_immediate(), right.as_immediate()) {
            let value = fold::compute_binop(op, a, b)
                .ok_or_else(|| OptimizeError::division_by_zero(BINARY, location))?;
            self.note(BINARY, location, "binary arithmetic expression simplified");
            return Ok(AstNode::new(AstNodeKind::Immediate { value }, location));
        }

        let mut op = op;
        if let Some((reduced, shift)) = right.as_immediate().and_then(|b| fold::reduce_strength(op, b)) {
            let message = match reduced {
                BinaryOperator::ShiftLeft => "multiplication transformed to left shift",
                _ => "division transformed to right shift",
            };
            self.note(BINARY, location, message);
            op = reduced;
            right = AstNode::new(AstNodeKind::Immediate { value: shift }, right.location);
        }

        Ok(AstNode::new(
            AstNodeKind::BinaryArithmetic { op, left: Box::new(left), right: Box::new(right) },
            location,
        ))
    }

    pub(super) fn optimize_unary(
        &mut self,
        op: UnaryOperator,
        operand: AstNode,
        location: Option<Location>,
    ) -> Result<AstNode, OptimizeError> {
        let operand = self.optimize_operand(operand, "unary operand")?;

        if let Some(a) = operand.as_immediate() {
            let value = fold::compute_unop(op, a)
                .ok_or_else(|| OptimizeError::range_overflow(UNARY, location))?;
            self.note(UNARY, location, "unary arithmetic expression simplified");
            return Ok(AstNode::new(AstNodeKind::Immediate { value }, location));
        }

        Ok(AstNode::new(
            AstNodeKind::UnaryArithmetic { op, operand: Box::new(operand) },
            location,
        ))
    }

    /// A constant index turns the access into a plain `Load`/`Store` after
    /// checking it against the array size. Other indices are left for the
    /// runtime to check.
    pub(super) fn optimize_array_access(
        &mut self,
        access: Access,
        array: ArrayRef,
        index: AstNode,
        location: Option<Location>,
    ) -> Result<AstNode, OptimizeError> {
        let index = self.optimize_operand(index, "array index")?;

        let Some(value) = index.as_immediate() else {
            let ArrayRef { addr, size, name } = array;
            let index = Box::new(index);
            let kind = match access {
                Access::Read => AstNodeKind::ArrayRead {
                    array_addr: addr,
                    array_size: size,
                    array_name: name,
                    index,
                },
                Access::Write => AstNodeKind::ArrayWrite {
                    array_addr: addr,
                    array_size: size,
                    array_name: name,
                    index,
                },
            };
            return Ok(AstNode::new(kind, location));
        };

        let offset = usize::try_from(value).ok().filter(|offset| *offset < array.size);
        let Some(offset) = offset else {
            return Err(OptimizeError::index_out_of_bounds(
                access.issuer(),
                location,
                access.verb(),
                &array.name,
                value,
                array.size,
            ));
        };

        let address = array.addr + offset;
        self.note(access.issuer(), location, "array access transformed to single variable access");
        let kind = match access {
            Access::Read => AstNodeKind::Load { address },
            Access::Write => AstNodeKind::Store { address },
        };
        Ok(AstNode::new(kind, location))
    }
}
