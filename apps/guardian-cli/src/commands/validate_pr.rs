// validate_pr.rs — `guardian validate-pr`: receiving-side gate.
//
// Base, head, and branch are supplied by the invoking environment (CI),
// not discovered here.

use std::path::Path;

use guardian_validate::{GitChangeSource, ProposalValidator, ValidationRequest, Verdict};

pub fn execute(base: String, head: String, branch: String, work_dir: &Path) -> anyhow::Result<()> {
    let validator = ProposalValidator::new();
    let source = GitChangeSource::new(work_dir);
    let request = ValidationRequest {
        base,
        head,
        head_branch: branch,
    };

    match validator.validate(&request, &source)? {
        Verdict::NotGuardian => {
            println!(
                "Not a guardian branch ({}); skipping validation.",
                request.head_branch
            );
        }
        Verdict::Accepted { patch_files } => {
            println!(
                "Guardian validation OK. Patch files: {}",
                patch_files.join(", ")
            );
        }
    }
    Ok(())
}
