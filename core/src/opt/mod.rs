//! AST optimizer: constant folding, dead-code removal, conditional folding
//! and static array access resolution, applied bottom-up in a single pass.
//!
//! Every rewrite consumes the node it is given and hands back its
//! replacement, so a caller never observes a half-rewritten child.
pub mod err;
pub mod fold;
pub mod trace;

mod expr;
mod stmt;

use crate::ast::{AstNode, AstNodeKind};
use crate::location::Location;

pub use err::{OptimizeError, OptimizeErrorKind};
pub use trace::{Diagnostic, Trace};

#[derive(Debug, Default)]
pub struct Optimizer {
    trace: Trace,
}

impl Optimizer {
    pub fn new() -> Self {
        Optimizer { trace: Trace::new(false) }
    }

    /// An optimizer that keeps every advisory note for later inspection.
    pub fn with_trace() -> Self {
        Optimizer { trace: Trace::new(true) }
    }

    /// Notes recorded so far, in the order the rewrites happened.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.trace.notes()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.trace.take()
    }

    /// Optimize an optional statement slot. An empty slot stays empty.
    pub fn optimize_option(&mut self, node: Option<AstNode>) -> Result<Option<AstNode>, OptimizeError> {
        match node {
            Some(node) => self.optimize(node),
            None => Ok(None),
        }
    }

    /// Rewrite `node` and its subtree. `Ok(None)` means the subtree has no
    /// effect and the parent must drop it.
    ///
    /// # Panics
    ///
    /// On input the front end can never produce: an already folded
    /// conditional, or a condition that is not a comparison.
    pub fn optimize(&mut self, node: AstNode) -> Result<Option<AstNode>, OptimizeError> {
        let AstNode { kind, location } = node;
        match kind {
            AstNodeKind::Block { statements } => self.optimize_block(statements, location).map(Some),
            AstNodeKind::Assignment { target, value } => {
                self.optimize_assignment(*target, *value, location).map(Some)
            }
            AstNodeKind::IfWhen { condition, true_block, false_block, edge_sensitive, end_line } => {
                let branches = stmt::Branches {
                    true_block: *true_block,
                    false_block: false_block.map(|b| *b),
                };
                self.optimize_if_when(*condition, branches, edge_sensitive, end_line, location)
            }
            AstNodeKind::While { condition, body } => self.optimize_while(*condition, *body, location),
            kind @ (AstNodeKind::FoldedIfWhen { .. } | AstNodeKind::FoldedWhile { .. }) => {
                panic!("{} is produced by the optimizer and cannot be optimized again", kind)
            }
            AstNodeKind::BinaryArithmetic { op, left, right } => {
                self.optimize_binary(op, *left, *right, location).map(Some)
            }
            AstNodeKind::UnaryArithmetic { op, operand } => {
                self.optimize_unary(op, *operand, location).map(Some)
            }
            AstNodeKind::ArrayRead { array_addr, array_size, array_name, index } => {
                let array = expr::ArrayRef { addr: array_addr, size: array_size, name: array_name };
                self.optimize_array_access(expr::Access::Read, array, *index, location).map(Some)
            }
            AstNodeKind::ArrayWrite { array_addr, array_size, array_name, index } => {
                let array = expr::ArrayRef { addr: array_addr, size: array_size, name: array_name };
                self.optimize_array_access(expr::Access::Write, array, *index, location).map(Some)
            }
            kind @ (AstNodeKind::EventDecl { .. }
            | AstNodeKind::SubDecl { .. }
            | AstNodeKind::Emit { .. }
            | AstNodeKind::CallSub { .. }
            | AstNodeKind::Call { .. }
            | AstNodeKind::Immediate { .. }
            | AstNodeKind::Load { .. }
            | AstNodeKind::Store { .. }) => Ok(Some(AstNode::new(kind, location))),
        }
    }

    /// Optimize a node that its parent cannot do without (operands, tests,
    /// assignment sides). Those never reduce to nothing.
    fn optimize_operand(&mut self, node: AstNode, role: &str) -> Result<AstNode, OptimizeError> {
        match self.optimize(node)? {
            Some(node) => Ok(node),
            None => panic!("{} was optimized away", role),
        }
    }

    fn note(&mut self, issuer: &str, location: Option<Location>, message: &str) {
        self.trace.note(issuer, location, message);
    }
}
