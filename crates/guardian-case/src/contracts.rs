// contracts.rs — Bundled JSON Schema contracts.
//
// The schema documents are opaque validation contracts: the pipeline never
// interprets them, it only hands them to guardian-schema. They ship inside
// the crate so every deployment validates against the same contract the
// code was built with; a directory override is supported for environments
// that pin their own copies.

use std::path::Path;

use serde_json::Value;

use crate::error::CaseError;

const SIGNAL_SCHEMA: &str = include_str!("../interfaces/signal.schema.json");
const CARE_CASE_SCHEMA: &str = include_str!("../interfaces/care-case.schema.json");

/// The bundled signal contract, parsed.
pub fn signal_schema() -> Result<Value, CaseError> {
    Ok(serde_json::from_str(SIGNAL_SCHEMA)?)
}

/// The bundled care-case contract, parsed.
pub fn care_case_schema() -> Result<Value, CaseError> {
    Ok(serde_json::from_str(CARE_CASE_SCHEMA)?)
}

/// Load both contracts from a directory instead of the bundled copies.
/// Expects `signal.schema.json` and `care-case.schema.json` inside `dir`.
pub fn load_from_dir(dir: &Path) -> Result<(Value, Value), CaseError> {
    let signal = load_schema_file(&dir.join("signal.schema.json"))?;
    let care_case = load_schema_file(&dir.join("care-case.schema.json"))?;
    Ok((signal, care_case))
}

fn load_schema_file(path: &Path) -> Result<Value, CaseError> {
    let text = std::fs::read_to_string(path).map_err(|source| CaseError::IoError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardian_schema::ContractValidator;

    #[test]
    fn bundled_contracts_parse() {
        assert!(signal_schema().is_ok());
        assert!(care_case_schema().is_ok());
    }

    #[test]
    fn bundled_contracts_compile() {
        ContractValidator::new(&signal_schema().unwrap()).unwrap();
        ContractValidator::new(&care_case_schema().unwrap()).unwrap();
    }
}
