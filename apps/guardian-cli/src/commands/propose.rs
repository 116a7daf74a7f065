// propose.rs — `guardian propose`: run the proposal controller.

use std::path::Path;

use guardian_case::{CareCase, CaseStore};
use guardian_propose::{GitBackend, ProposalController, ProposalOutcome, ProposeConfig};

pub fn execute(cases_dir: &Path, work_dir: &Path, config_path: &Path) -> anyhow::Result<()> {
    let store = CaseStore::new(cases_dir)?;
    let records = store.list()?;
    if records.is_empty() {
        println!("No generated care-cases found.");
        return Ok(());
    }

    let config = ProposeConfig::load_or_default(config_path);
    let backend = GitBackend::new(work_dir);
    let controller = ProposalController::new(&backend, config);

    // CaseStore::list is sorted by location, so processing order — and
    // with it the sequence of external calls — is stable across runs.
    let cases: Vec<CareCase> = records.into_iter().map(|(_, case)| case).collect();
    let report = controller.run(&cases)?;

    let created = report
        .outcomes
        .iter()
        .filter(|o| matches!(o.result, Ok(ProposalOutcome::Created { .. })))
        .count();
    if created > 0 {
        println!("Created {created} patch proposal(s).");
    } else {
        println!("No eligible care-cases for patch proposals.");
    }

    let failures: Vec<String> = report
        .hard_failures()
        .map(|(case_id, err)| format!("- {case_id}: {err}"))
        .collect();
    if !failures.is_empty() {
        anyhow::bail!(
            "{} case(s) failed:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
    Ok(())
}
