//! Error type for the optimizer.
//!
//! `OptimizeError` is returned by the optimizer when a rewrite proves that
//! the program cannot be compiled. It implements `PulseErrorExt` for unified
//! diagnostic reporting.

use crate::error::{Level, PulseErrorExt};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeErrorKind {
    DivisionByZero,
    InfiniteLoop,
    RangeOverflow,
    ArrayIndexOutOfBounds { array: String, index: i16, size: usize },
}

#[derive(Debug, Clone)]
pub struct OptimizeError {
    kind: OptimizeErrorKind,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl OptimizeError {
    pub fn with(
        kind: OptimizeErrorKind,
        message: String,
        issuer: String,
        location: Option<Location>,
    ) -> Self {
        OptimizeError {
            kind,
            level: Level::Error,
            message,
            issuer,
            location,
        }
    }

    pub fn division_by_zero(issuer: &str, location: Option<Location>) -> Self {
        Self::with(
            OptimizeErrorKind::DivisionByZero,
            "Division by zero.".to_string(),
            issuer.to_string(),
            location,
        )
    }

    pub fn infinite_loop(issuer: &str, location: Option<Location>) -> Self {
        Self::with(
            OptimizeErrorKind::InfiniteLoop,
            "Infinite loops not allowed".to_string(),
            issuer.to_string(),
            location,
        )
    }

    pub fn range_overflow(issuer: &str, location: Option<Location>) -> Self {
        Self::with(
            OptimizeErrorKind::RangeOverflow,
            format!("{} has no positive correspondance in 16 bits integers.", i16::MIN),
            issuer.to_string(),
            location,
        )
    }

    /// `access` is the verb used in the message, `read` or `write`.
    pub fn index_out_of_bounds(
        issuer: &str,
        location: Option<Location>,
        access: &str,
        array: &str,
        index: i16,
        size: usize,
    ) -> Self {
        Self::with(
            OptimizeErrorKind::ArrayIndexOutOfBounds {
                array: array.to_string(),
                index,
                size,
            },
            format!(
                "Out of bound static array access. Trying to {} index {} of array {} of size {}",
                access, index, array, size
            ),
            issuer.to_string(),
            location,
        )
    }

    pub fn kind(&self) -> &OptimizeErrorKind {
        &self.kind
    }
}

impl std::fmt::Display for OptimizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for OptimizeError {}

impl PulseErrorExt for OptimizeError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location
    }
}
