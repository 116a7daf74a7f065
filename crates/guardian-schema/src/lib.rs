//! Contract validation for Guardian documents.
//!
//! Signal and care-case documents are defined by JSON Schema contracts
//! (Draft 2020-12). This crate wraps schema compilation and validation with
//! two guarantees the rest of the pipeline relies on:
//!
//! 1. **Every** violation is reported, not just the first. A detector whose
//!    signal fails in three places should fix all three from one run.
//! 2. Violations are sorted by their location in the document, so reports
//!    are deterministic across runs.

pub mod error;

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

pub use error::{SchemaError, Violation};

/// A compiled schema contract that documents can be checked against.
///
/// Compilation happens once in `new()`; `check()` can then be called for
/// every document of that kind. The underlying validator is Draft 2020-12,
/// matching the `$schema` declaration in the bundled contracts.
pub struct ContractValidator {
    compiled: JSONSchema,
}

impl ContractValidator {
    /// Compile a schema document into a reusable validator.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(schema)
            .map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate one document against this contract.
    ///
    /// On failure, returns every violation found, each tagged with its
    /// dot-joined location (`system.env`) or `(root)` for top-level
    /// violations, sorted by location. `label` names the document in the
    /// report (e.g. the file path it was loaded from).
    pub fn check(&self, instance: &Value, label: &str) -> Result<(), SchemaError> {
        let mut violations: Vec<Violation> = match self.compiled.validate(instance) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|e| Violation {
                    location: dotted_location(&e.instance_path.to_string()),
                    message: e.to_string(),
                })
                .collect(),
        };

        violations.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.message.cmp(&b.message))
        });

        Err(SchemaError::Violations {
            label: label.to_string(),
            violations,
        })
    }
}

/// Convert a JSON pointer (`/system/env`) to the dot-joined form used in
/// violation reports (`system.env`). The empty pointer is the whole document.
fn dotted_location(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "(root)".to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "required": ["name", "age"],
            "properties": {
                "name": { "type": "string" },
                "age": { "type": "number" },
                "address": {
                    "type": "object",
                    "required": ["city"],
                    "properties": { "city": { "type": "string" } }
                }
            }
        })
    }

    #[test]
    fn valid_document_passes() {
        let validator = ContractValidator::new(&person_schema()).unwrap();
        let doc = json!({ "name": "ada", "age": 36 });
        assert!(validator.check(&doc, "person").is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let validator = ContractValidator::new(&person_schema()).unwrap();
        // Two independent problems: wrong type and a missing required field.
        let doc = json!({ "name": 7 });

        let err = validator.check(&doc, "person").unwrap_err();
        match err {
            SchemaError::Violations { label, violations } => {
                assert_eq!(label, "person");
                assert_eq!(violations.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn violations_are_sorted_by_location() {
        let validator = ContractValidator::new(&person_schema()).unwrap();
        let doc = json!({ "name": 7, "age": "old", "address": {} });

        let err = validator.check(&doc, "person").unwrap_err();
        let SchemaError::Violations { violations, .. } = err else {
            panic!("expected violations");
        };
        let locations: Vec<&str> = violations.iter().map(|v| v.location.as_str()).collect();
        let mut sorted = locations.clone();
        sorted.sort();
        assert_eq!(locations, sorted);
    }

    #[test]
    fn nested_violation_location_is_dot_joined() {
        let validator = ContractValidator::new(&person_schema()).unwrap();
        let doc = json!({ "name": "ada", "age": 36, "address": { "city": 9 } });

        let err = validator.check(&doc, "person").unwrap_err();
        let SchemaError::Violations { violations, .. } = err else {
            panic!("expected violations");
        };
        assert_eq!(violations[0].location, "address.city");
    }

    #[test]
    fn top_level_violation_uses_root_marker() {
        let validator = ContractValidator::new(&person_schema()).unwrap();
        let doc = json!({});

        let err = validator.check(&doc, "person").unwrap_err();
        let SchemaError::Violations { violations, .. } = err else {
            panic!("expected violations");
        };
        assert!(violations.iter().all(|v| v.location == "(root)"));
    }

    #[test]
    fn report_renders_one_line_per_violation() {
        let validator = ContractValidator::new(&person_schema()).unwrap();
        let doc = json!({ "name": 7 });

        let err = validator.check(&doc, "person").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.starts_with("person validation failed:"));
        assert_eq!(rendered.matches("\n- ").count(), 2);
    }

    #[test]
    fn invalid_schema_fails_compilation() {
        let bad = json!({ "type": "not-a-type" });
        assert!(matches!(
            ContractValidator::new(&bad),
            Err(SchemaError::Compile(_))
        ));
    }
}
