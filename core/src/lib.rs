pub mod ast;
pub mod error;
pub mod location;
pub mod opt;

pub use ast::{AstNode, AstNodeKind, BinaryOperator, UnaryOperator};
pub use error::{Level, PulseErrorExt};
pub use location::Location;
pub use opt::{Diagnostic, OptimizeError, OptimizeErrorKind, Optimizer};

/// Result of optimizing one program fragment.
#[derive(Debug)]
pub struct OptimizedProgram {
    /// The reduced tree, or `None` when the whole fragment was eliminated.
    pub root: Option<AstNode>,
    /// Advisory notes, empty unless tracing was requested.
    pub diagnostics: Vec<Diagnostic>,
}

pub fn generate_error_report<E: PulseErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("PULSEC | {} | {} | {}", level, location, message)
}

/// Run the optimizer over a whole tree handed over by the front end.
pub fn optimize_program(root: AstNode, trace: bool) -> Result<OptimizedProgram, OptimizeError> {
    let mut optimizer = if trace { Optimizer::with_trace() } else { Optimizer::new() };
    let root = optimizer.optimize(root)?;
    debug_assert!(root.as_ref().is_none_or(AstNode::is_emittable));
    Ok(OptimizedProgram { root, diagnostics: optimizer.take_diagnostics() })
}

/// Decode a tree serialized by the front end.
pub fn ast_from_json(source: &str) -> Result<AstNode, serde_json::Error> {
    serde_json::from_str(source)
}

pub fn ast_to_json(node: &AstNode) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(node)
}
