//! file: core/src/ast/kind.rs
//! description: AST node kind definitions and operator enums.
//!
//! Defines `AstNodeKind` along with `BinaryOperator` and `UnaryOperator`.
//! The set of kinds is closed: the front end produces the unfolded kinds,
//! the optimizer rewrites them, and the emitter consumes what remains.
//!
use serde::{Deserialize, Serialize};

use super::node::AstNode;

/// Represents binary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    ShiftLeft,  // <<
    ShiftRight, // >>
    Add,        // +
    Sub,        // -
    Mul,        // *
    Div,        // /
    Mod,        // %
    Eq,         // ==
    Ne,         // !=
    Gt,         // >
    Ge,         // >=
    Lt,         // <
    Le,         // <=
    Or,         // or
    And,        // and
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Gt
                | BinaryOperator::Ge
                | BinaryOperator::Lt
                | BinaryOperator::Le
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::Or | BinaryOperator::And)
    }

    /// Operators allowed as the whole test of an `if`, `when` or `while`.
    pub fn is_condition(&self) -> bool {
        self.is_comparison() || self.is_logical()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Or => "or",
            BinaryOperator::And => "and",
        }
    }
}

/// Represents unary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Neg, // -
    Abs, // abs
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::Abs => "abs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstNodeKind {
    Block { statements: Vec<AstNode> },
    Assignment { target: Box<AstNode>, value: Box<AstNode> },

    IfWhen {
        condition: Box<AstNode>,
        true_block: Box<AstNode>,
        false_block: Option<Box<AstNode>>,
        edge_sensitive: bool,
        end_line: Option<usize>,
    },
    FoldedIfWhen {
        op: BinaryOperator,
        left: Box<AstNode>,
        right: Box<AstNode>,
        true_block: Box<AstNode>,
        false_block: Option<Box<AstNode>>,
        edge_sensitive: bool,
        end_line: Option<usize>,
    },
    While { condition: Box<AstNode>, body: Box<AstNode> },
    FoldedWhile {
        op: BinaryOperator,
        left: Box<AstNode>,
        right: Box<AstNode>,
        body: Box<AstNode>,
    },

    EventDecl { event_id: usize },
    SubDecl { sub_id: usize },
    Emit { event_id: usize, args: Vec<AstNode> },
    CallSub { sub_id: usize, args: Vec<AstNode> },
    Call { function_id: usize, args: Vec<AstNode> },

    BinaryArithmetic { op: BinaryOperator, left: Box<AstNode>, right: Box<AstNode> },
    UnaryArithmetic { op: UnaryOperator, operand: Box<AstNode> },
    Immediate { value: i16 },
    Load { address: usize },
    Store { address: usize },

    ArrayRead {
        array_addr: usize,
        array_size: usize,
        array_name: String,
        index: Box<AstNode>,
    },
    ArrayWrite {
        array_addr: usize,
        array_size: usize,
        array_name: String,
        index: Box<AstNode>,
    },
}

impl AstNodeKind {
    /// Control flow that only exists before optimization and must never
    /// reach the bytecode emitter.
    pub fn is_unfolded(&self) -> bool {
        matches!(self, AstNodeKind::IfWhen { .. } | AstNodeKind::While { .. })
    }
}

use std::fmt;

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNodeKind::Block { .. } => write!(f, "Block"),
            AstNodeKind::Assignment { .. } => write!(f, "Assignment"),
            AstNodeKind::IfWhen { .. } => write!(f, "IfWhen"),
            AstNodeKind::FoldedIfWhen { .. } => write!(f, "FoldedIfWhen"),
            AstNodeKind::While { .. } => write!(f, "While"),
            AstNodeKind::FoldedWhile { .. } => write!(f, "FoldedWhile"),
            AstNodeKind::EventDecl { .. } => write!(f, "EventDecl"),
            AstNodeKind::SubDecl { .. } => write!(f, "SubDecl"),
            AstNodeKind::Emit { .. } => write!(f, "Emit"),
            AstNodeKind::CallSub { .. } => write!(f, "CallSub"),
            AstNodeKind::Call { .. } => write!(f, "Call"),
            AstNodeKind::BinaryArithmetic { .. } => write!(f, "BinaryArithmetic"),
            AstNodeKind::UnaryArithmetic { .. } => write!(f, "UnaryArithmetic"),
            AstNodeKind::Immediate { .. } => write!(f, "Immediate"),
            AstNodeKind::Load { .. } => write!(f, "Load"),
            AstNodeKind::Store { .. } => write!(f, "Store"),
            AstNodeKind::ArrayRead { .. } => write!(f, "ArrayRead"),
            AstNodeKind::ArrayWrite { .. } => write!(f, "ArrayWrite"),
        }
    }
}
