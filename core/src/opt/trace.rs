//! file: core/src/opt/trace.rs
//! description: advisory notes recorded while optimizing.
//!
//! Notes are purely observational. They are always forwarded to the `log`
//! facade at debug level and, when tracing is enabled, kept in order so a
//! driver can print them (`-v`). Nothing here influences the rewritten tree.
//!
use log::debug;

use crate::error::{Level, PulseErrorExt};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Option<Location>,
    pub message: String,
    issuer: String,
}

impl Diagnostic {
    pub fn new(location: Option<Location>, message: String, issuer: String) -> Self {
        Diagnostic { location, message, issuer }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}: {}", loc, self.message),
            None => write!(f, "<synthesized>: {}", self.message),
        }
    }
}

impl PulseErrorExt for Diagnostic {
    fn level(&self) -> Level {
        Level::Info
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

#[derive(Debug, Default)]
pub struct Trace {
    enabled: bool,
    notes: Vec<Diagnostic>,
}

impl Trace {
    pub fn new(enabled: bool) -> Self {
        Trace { enabled, notes: Vec::new() }
    }

    pub fn note(&mut self, issuer: &str, location: Option<Location>, message: &str) {
        match location {
            Some(loc) => debug!("[{}] {}: {}", issuer, loc, message),
            None => debug!("[{}] {}", issuer, message),
        }
        if self.enabled {
            self.notes.push(Diagnostic::new(location, message.to_string(), issuer.to_string()));
        }
    }

    pub fn notes(&self) -> &[Diagnostic] {
        &self.notes
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.notes)
    }
}
