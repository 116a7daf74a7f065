// error.rs — Error types for change-request validation.

use thiserror::Error;

/// Errors that can occur while validating an incoming change request.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The head branch claims the guardian prefix but does not conform
    /// to `guardian/<uuid>`. Rejected before any content checks.
    #[error("guardian branch must match 'guardian/<case_uuid>'; got: {0}")]
    BranchFormat(String),

    /// The request violates structural invariants; every violation found
    /// is listed.
    #[error("structural validation failed:{}", format_violations(.violations))]
    Structural { violations: Vec<String> },

    /// The diff or file contents could not be read.
    #[error("change source error: {0}")]
    Source(String),
}

fn format_violations(violations: &[String]) -> String {
    violations
        .iter()
        .map(|v| format!("\n- {v}"))
        .collect::<String>()
}
