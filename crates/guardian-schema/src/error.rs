// error.rs — Error types for contract validation.

use std::fmt;

use thiserror::Error;

/// One schema violation: where in the document, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dot-joined field path (`system.env`), or `(root)` at top level.
    pub location: String,
    /// Human-readable description from the schema validator.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Errors that can occur while compiling or applying a schema contract.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema document itself is not a valid schema.
    #[error("schema compilation failed: {0}")]
    Compile(String),

    /// The checked document violates the contract; all violations are
    /// listed, sorted by location.
    #[error("{label} validation failed:{}", format_violations(.violations))]
    Violations {
        label: String,
        violations: Vec<Violation>,
    },
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("\n- {v}"))
        .collect::<String>()
}
