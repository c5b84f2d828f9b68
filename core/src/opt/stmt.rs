//! file: core/src/opt/stmt.rs
//! description: rewrite rules for statements and control flow.
//!
//! Blocks shed statements that reduce to nothing. Conditionals and loops
//! either disappear, collapse to one branch, or are folded into the
//! compare-and-branch forms (`FoldedIfWhen`, `FoldedWhile`) the VM executes.
//!
use crate::ast::{AstNode, AstNodeKind, BinaryOperator};
use crate::location::Location;

use super::{OptimizeError, Optimizer};

const IF_WHEN: &str = "pulsec.opt.if_when";
const WHILE: &str = "pulsec.opt.while";

pub(super) struct Branches {
    pub true_block: AstNode,
    pub false_block: Option<AstNode>,
}

fn is_dead(block: &Option<AstNode>) -> bool {
    block.as_ref().is_none_or(AstNode::is_empty_block)
}

/// Take a condition apart into the pieces of a fused compare-and-branch.
fn split_condition(condition: AstNode, construct: &str) -> (BinaryOperator, Box<AstNode>, Box<AstNode>) {
    match condition.kind {
        AstNodeKind::BinaryArithmetic { op, left, right } => {
            assert!(
                op.is_condition(),
                "{} condition must be a comparison, found `{}`",
                construct,
                op.symbol()
            );
            (op, left, right)
        }
        other => panic!("{} condition must be a comparison, found {}", construct, other),
    }
}

impl Optimizer {
    pub(super) fn optimize_block(
        &mut self,
        statements: Vec<AstNode>,
        location: Option<Location>,
    ) -> Result<AstNode, OptimizeError> {
        let mut kept = Vec::with_capacity(statements.len());
        for statement in statements {
            match self.optimize(statement)? {
                Some(node) if !node.is_empty_block() => kept.push(node),
                _ => {}
            }
        }
        Ok(AstNode::new(AstNodeKind::Block { statements: kept }, location))
    }

    pub(super) fn optimize_assignment(
        &mut self,
        target: AstNode,
        value: AstNode,
        location: Option<Location>,
    ) -> Result<AstNode, OptimizeError> {
        let target = self.optimize_operand(target, "assignment target")?;
        let value = self.optimize_operand(value, "assignment value")?;
        Ok(AstNode::new(
            AstNodeKind::Assignment { target: Box::new(target), value: Box::new(value) },
            location,
        ))
    }

    pub(super) fn optimize_if_when(
        &mut self,
        condition: AstNode,
        branches: Branches,
        edge_sensitive: bool,
        end_line: Option<usize>,
        location: Option<Location>,
    ) -> Result<Option<AstNode>, OptimizeError> {
        let condition = self.optimize_operand(condition, "if condition")?;
        let true_block = self.optimize(branches.true_block)?;
        let false_block = self.optimize_option(branches.false_block)?;

        if is_dead(&true_block) && is_dead(&false_block) {
            self.note(IF_WHEN, location, "if test removed because it had no associated code");
            return Ok(None);
        }

        if let Some(value) = condition.as_immediate() {
            if value != 0 {
                self.note(IF_WHEN, location, "if test simplified because condition was always true");
                return Ok(true_block);
            }
            self.note(IF_WHEN, location, "if test simplified because condition was always false");
            return Ok(false_block);
        }

        // the emitter always expects a true branch to jump over
        let true_block = true_block.unwrap_or_else(|| AstNode::block(Vec::new()));
        let (op, left, right) = split_condition(condition, "if");

        self.note(IF_WHEN, location, "if condition folded inside node");
        Ok(Some(AstNode::new(
            AstNodeKind::FoldedIfWhen {
                op,
                left,
                right,
                true_block: Box::new(true_block),
                false_block: false_block.map(Box::new),
                edge_sensitive,
                end_line,
            },
            location,
        )))
    }

    pub(super) fn optimize_while(
        &mut self,
        condition: AstNode,
        body: AstNode,
        location: Option<Location>,
    ) -> Result<Option<AstNode>, OptimizeError> {
        let condition = self.optimize_operand(condition, "while condition")?;
        let body = self.optimize(body)?;

        if let Some(value) = condition.as_immediate() {
            if value != 0 {
                return Err(OptimizeError::infinite_loop(WHILE, location));
            }
            self.note(WHILE, location, "while removed because condition is always false");
            return Ok(None);
        }

        let Some(body) = body.filter(|b| !b.is_empty_block()) else {
            self.note(WHILE, location, "while removed because it contained no statement");
            return Ok(None);
        };

        let (op, left, right) = split_condition(condition, "while");

        self.note(WHILE, location, "while condition folded inside node");
        Ok(Some(AstNode::new(
            AstNodeKind::FoldedWhile { op, left, right, body: Box::new(body) },
            location,
        )))
    }
}
