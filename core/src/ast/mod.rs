pub mod kind;
pub mod node;

pub use kind::{AstNodeKind, BinaryOperator, UnaryOperator};
pub use node::AstNode;
