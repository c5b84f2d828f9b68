use serde::{Deserialize, Serialize};

use crate::location::Location;

use super::kind::{AstNodeKind, BinaryOperator, UnaryOperator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: AstNodeKind,
    #[serde(default)]
    pub location: Option<Location>,
}

impl AstNode {
    pub fn new(kind: AstNodeKind, location: Option<Location>) -> Self {
        AstNode { kind, location }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Shorthand for `with_location(Location::new(line, column))`.
    pub fn at(self, line: usize, column: usize) -> Self {
        self.with_location(Location::new(line, column))
    }

    pub fn block(statements: Vec<AstNode>) -> Self {
        Self::new(AstNodeKind::Block { statements }, None)
    }

    pub fn assignment(target: AstNode, value: AstNode) -> Self {
        Self::new(
            AstNodeKind::Assignment { target: Box::new(target), value: Box::new(value) },
            None,
        )
    }

    pub fn if_when(
        condition: AstNode,
        true_block: AstNode,
        false_block: Option<AstNode>,
        edge_sensitive: bool,
    ) -> Self {
        Self::new(
            AstNodeKind::IfWhen {
                condition: Box::new(condition),
                true_block: Box::new(true_block),
                false_block: false_block.map(Box::new),
                edge_sensitive,
                end_line: None,
            },
            None,
        )
    }

    pub fn while_loop(condition: AstNode, body: AstNode) -> Self {
        Self::new(
            AstNodeKind::While { condition: Box::new(condition), body: Box::new(body) },
            None,
        )
    }

    pub fn event_decl(event_id: usize) -> Self {
        Self::new(AstNodeKind::EventDecl { event_id }, None)
    }

    pub fn sub_decl(sub_id: usize) -> Self {
        Self::new(AstNodeKind::SubDecl { sub_id }, None)
    }

    pub fn emit(event_id: usize, args: Vec<AstNode>) -> Self {
        Self::new(AstNodeKind::Emit { event_id, args }, None)
    }

    pub fn call_sub(sub_id: usize) -> Self {
        Self::new(AstNodeKind::CallSub { sub_id, args: Vec::new() }, None)
    }

    pub fn call(function_id: usize, args: Vec<AstNode>) -> Self {
        Self::new(AstNodeKind::Call { function_id, args }, None)
    }

    pub fn binary(op: BinaryOperator, left: AstNode, right: AstNode) -> Self {
        Self::new(
            AstNodeKind::BinaryArithmetic { op, left: Box::new(left), right: Box::new(right) },
            None,
        )
    }

    pub fn unary(op: UnaryOperator, operand: AstNode) -> Self {
        Self::new(AstNodeKind::UnaryArithmetic { op, operand: Box::new(operand) }, None)
    }

    pub fn immediate(value: i16) -> Self {
        Self::new(AstNodeKind::Immediate { value }, None)
    }

    pub fn load(address: usize) -> Self {
        Self::new(AstNodeKind::Load { address }, None)
    }

    pub fn store(address: usize) -> Self {
        Self::new(AstNodeKind::Store { address }, None)
    }

    pub fn array_read(array_addr: usize, array_size: usize, array_name: &str, index: AstNode) -> Self {
        Self::new(
            AstNodeKind::ArrayRead {
                array_addr,
                array_size,
                array_name: array_name.to_string(),
                index: Box::new(index),
            },
            None,
        )
    }

    pub fn array_write(array_addr: usize, array_size: usize, array_name: &str, index: AstNode) -> Self {
        Self::new(
            AstNodeKind::ArrayWrite {
                array_addr,
                array_size,
                array_name: array_name.to_string(),
                index: Box::new(index),
            },
            None,
        )
    }

    /// The value of an `Immediate` node, `None` for every other kind.
    pub fn as_immediate(&self) -> Option<i16> {
        match self.kind {
            AstNodeKind::Immediate { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_empty_block(&self) -> bool {
        matches!(&self.kind, AstNodeKind::Block { statements } if statements.is_empty())
    }

    /// Direct sub-nodes in evaluation order.
    pub fn children(&self) -> Vec<&AstNode> {
        match &self.kind {
            AstNodeKind::Block { statements } => statements.iter().collect(),
            AstNodeKind::Assignment { target, value } => vec![&**target, &**value],
            AstNodeKind::IfWhen { condition, true_block, false_block, .. } => {
                let mut v = vec![&**condition, &**true_block];
                v.extend(false_block.as_deref());
                v
            }
            AstNodeKind::FoldedIfWhen { left, right, true_block, false_block, .. } => {
                let mut v = vec![&**left, &**right, &**true_block];
                v.extend(false_block.as_deref());
                v
            }
            AstNodeKind::While { condition, body } => vec![&**condition, &**body],
            AstNodeKind::FoldedWhile { left, right, body, .. } => vec![&**left, &**right, &**body],
            AstNodeKind::Emit { args, .. }
            | AstNodeKind::CallSub { args, .. }
            | AstNodeKind::Call { args, .. } => args.iter().collect(),
            AstNodeKind::BinaryArithmetic { left, right, .. } => vec![&**left, &**right],
            AstNodeKind::UnaryArithmetic { operand, .. } => vec![&**operand],
            AstNodeKind::ArrayRead { index, .. } | AstNodeKind::ArrayWrite { index, .. } => vec![&**index],
            AstNodeKind::EventDecl { .. }
            | AstNodeKind::SubDecl { .. }
            | AstNodeKind::Immediate { .. }
            | AstNodeKind::Load { .. }
            | AstNodeKind::Store { .. } => Vec::new(),
        }
    }

    /// True when no unfolded conditional or loop survives anywhere in this
    /// subtree. Array accesses with a runtime index are legitimately kept.
    pub fn is_emittable(&self) -> bool {
        !self.kind.is_unfolded() && self.children().into_iter().all(AstNode::is_emittable)
    }

    fn describe(&self) -> String {
        match &self.kind {
            AstNodeKind::Block { .. } => "Block".to_string(),
            AstNodeKind::Assignment { .. } => "Assign".to_string(),
            AstNodeKind::IfWhen { edge_sensitive, .. } => {
                if *edge_sensitive { "When".to_string() } else { "If".to_string() }
            }
            AstNodeKind::FoldedIfWhen { op, edge_sensitive, end_line, .. } => {
                let head = if *edge_sensitive { "Folded when" } else { "Folded if" };
                match end_line {
                    Some(line) => format!("{}: {} (end line {})", head, op.symbol(), line),
                    None => format!("{}: {}", head, op.symbol()),
                }
            }
            AstNodeKind::While { .. } => "While".to_string(),
            AstNodeKind::FoldedWhile { op, .. } => format!("Folded while: {}", op.symbol()),
            AstNodeKind::EventDecl { event_id } => format!("Event: {}", event_id),
            AstNodeKind::SubDecl { sub_id } => format!("Sub: {}", sub_id),
            AstNodeKind::Emit { event_id, .. } => format!("Emit: {}", event_id),
            AstNodeKind::CallSub { sub_id, .. } => format!("CallSub: {}", sub_id),
            AstNodeKind::Call { function_id, .. } => format!("Call: {}", function_id),
            AstNodeKind::BinaryArithmetic { op, .. } => format!("Arithmetic: {}", op.symbol()),
            AstNodeKind::UnaryArithmetic { op, .. } => format!("Unary arithmetic: {}", op.symbol()),
            AstNodeKind::Immediate { value } => format!("Immediate: {}", value),
            AstNodeKind::Load { address } => format!("Load: addr {}", address),
            AstNodeKind::Store { address } => format!("Store: addr {}", address),
            AstNodeKind::ArrayRead { array_addr, array_size, array_name, .. } => {
                format!("ArrayRead: {} (addr {}, size {})", array_name, array_addr, array_size)
            }
            AstNodeKind::ArrayWrite { array_addr, array_size, array_name, .. } => {
                format!("ArrayWrite: {} (addr {}, size {})", array_name, array_addr, array_size)
            }
        }
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for _ in 0..indent {
            write!(f, "  ")?;
        }
        writeln!(f, "{}", self.describe())?;
        for child in self.children() {
            child.dump(f, indent + 1)?;
        }
        Ok(())
    }
}

use std::fmt;

/// Indented tree dump, one node per line.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, 0)
    }
}
