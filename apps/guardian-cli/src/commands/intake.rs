// intake.rs — `guardian intake`: signal → care-case synthesis.
//
// Sequencing is the contract here: a signal that fails schema validation
// never reaches the synthesizer, and a synthesized case that fails its own
// contract aborts the run before persistence.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;

use guardian_case::synthesize::{synthesize, verify_consistency};
use guardian_case::{contracts, CaseStore, Signal};
use guardian_schema::ContractValidator;

pub fn execute(
    signals: &[PathBuf],
    out_dir: &Path,
    schema_dir: Option<&Path>,
) -> anyhow::Result<()> {
    if signals.is_empty() {
        write_github_outputs(&[])?;
        println!("No signal files given.");
        return Ok(());
    }

    let (signal_schema, case_schema) = match schema_dir {
        Some(dir) => contracts::load_from_dir(dir)?,
        None => (contracts::signal_schema()?, contracts::care_case_schema()?),
    };
    let signal_contract = ContractValidator::new(&signal_schema)?;
    let case_contract = ContractValidator::new(&case_schema)?;

    let store = CaseStore::new(out_dir)?;
    let mut generated: Vec<PathBuf> = Vec::new();

    for path in signals {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read signal file {}", path.display()))?;
        let document: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("signal file {} is not valid JSON", path.display()))?;

        signal_contract.check(&document, &format!("Signal ({})", path.display()))?;
        let signal: Signal = serde_json::from_value(document)
            .with_context(|| format!("failed to decode signal {}", path.display()))?;

        let case = synthesize(&signal);
        verify_consistency(&case, &case_contract)?;

        let location = store.persist(&case)?;
        println!("Generated care-case: {}", location.display());
        generated.push(location);
    }

    write_github_outputs(&generated)?;
    println!("Intake complete: {} care-case(s) generated.", generated.len());
    Ok(())
}

/// Report generated case files to the invoking workflow, when it asks for
/// them via GITHUB_OUTPUT.
fn write_github_outputs(generated: &[PathBuf]) -> anyhow::Result<()> {
    let Some(out_path) = std::env::var_os("GITHUB_OUTPUT") else {
        return Ok(());
    };
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&out_path)
        .with_context(|| "failed to open GITHUB_OUTPUT".to_string())?;

    let case_files = generated
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(file, "has_cases={}", !generated.is_empty())?;
    writeln!(file, "case_files={case_files}")?;
    Ok(())
}
