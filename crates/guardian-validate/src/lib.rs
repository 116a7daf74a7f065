//! Receiving-side gate for Guardian change requests.
//!
//! Runs where the change request arrives, against its head branch name and
//! base/head revision pair, and enforces the structural contract a
//! guardian-authored request must satisfy before it may proceed toward
//! merge:
//!
//! - head branch conforms to `guardian/<case_uuid>`
//! - every changed file lives under the patches directory
//! - at least one changed file is a recognizable proposal artifact
//! - each artifact carries the required sections, mentions its own case
//!   id, and has at least one unchecked checklist item
//!
//! Requests from branches without the guardian prefix are not this gate's
//! business: it reports [`Verdict::NotGuardian`] and enforces nothing.
//!
//! All violations across all checks are accumulated before failing, so one
//! run yields the complete report.

pub mod error;
pub mod source;

use regex::Regex;

pub use error::ValidateError;
pub use source::{ChangeSource, GitChangeSource};

/// Section markers a proposal artifact must contain, byte-for-byte.
/// These mirror what the proposing side renders; they are the wire
/// contract, not an implementation detail.
const REQUIRED_SECTIONS: [&str; 4] = [
    "# Guardian Patch Proposal",
    "## Root cause hypothesis",
    "## Suggested patch steps",
    "## Verification checklist",
];

/// Unchecked checklist marker.
const UNCHECKED_ITEM: &str = "- [ ]";

const BRANCH_PREFIX: &str = "guardian/";
const PATCHES_DIR: &str = "guardian/patches/";

/// An incoming change request, identified by the parameters the invoking
/// environment supplies.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub base: String,
    pub head: String,
    pub head_branch: String,
}

/// Successful validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Not a guardian-authored request; no enforcement performed.
    NotGuardian,
    /// All invariants hold; lists the recognized proposal artifacts.
    Accepted { patch_files: Vec<String> },
}

/// The structural validator. Holds its compiled conformance patterns.
pub struct ProposalValidator {
    branch_re: Regex,
    patch_re: Regex,
}

impl Default for ProposalValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalValidator {
    pub fn new() -> Self {
        Self {
            branch_re: Regex::new(r"^guardian/[0-9a-fA-F-]{36}$").expect("branch pattern"),
            patch_re: Regex::new(r"^guardian/patches/([0-9a-fA-F-]{36})\.md$")
                .expect("patch path pattern"),
        }
    }

    /// Validate one incoming change request.
    ///
    /// Branch-format violations reject immediately (there is no case id to
    /// anchor further checks on); everything else accumulates into a
    /// single [`ValidateError::Structural`] report.
    pub fn validate(
        &self,
        request: &ValidationRequest,
        source: &impl ChangeSource,
    ) -> Result<Verdict, ValidateError> {
        if !request.head_branch.starts_with(BRANCH_PREFIX) {
            tracing::info!(
                branch = %request.head_branch,
                "not a guardian branch; skipping validation"
            );
            return Ok(Verdict::NotGuardian);
        }

        if !self.branch_re.is_match(&request.head_branch) {
            return Err(ValidateError::BranchFormat(request.head_branch.clone()));
        }

        let files = source.changed_files(&request.base, &request.head)?;
        let mut violations: Vec<String> = Vec::new();

        // File-scope invariant: the request may touch nothing outside the
        // patches directory.
        for file in files.iter().filter(|f| !f.starts_with(PATCHES_DIR)) {
            violations.push(format!(
                "{file}: outside {PATCHES_DIR}; guardian requests may only modify proposal artifacts"
            ));
        }

        // Recognize proposal artifacts and extract their case ids.
        let patch_files: Vec<(String, String)> = files
            .iter()
            .filter_map(|f| {
                self.patch_re
                    .captures(f)
                    .map(|c| (f.clone(), c[1].to_string()))
            })
            .collect();

        if patch_files.is_empty() {
            violations.push(format!(
                "no patch file found under {PATCHES_DIR}<case_id>.md"
            ));
        }

        for (path, case_id) in &patch_files {
            self.check_patch_content(path, case_id, source, &mut violations)?;
        }

        if violations.is_empty() {
            Ok(Verdict::Accepted {
                patch_files: patch_files.into_iter().map(|(p, _)| p).collect(),
            })
        } else {
            Err(ValidateError::Structural { violations })
        }
    }

    /// Content invariants for one proposal artifact. Appends to
    /// `violations` rather than failing, so all files get checked.
    fn check_patch_content(
        &self,
        path: &str,
        case_id: &str,
        source: &impl ChangeSource,
        violations: &mut Vec<String>,
    ) -> Result<(), ValidateError> {
        let content = match source.read_file(path)? {
            Some(content) if !content.is_empty() => content,
            _ => {
                violations.push(format!("{path}: file missing or empty"));
                return Ok(());
            }
        };

        for needle in REQUIRED_SECTIONS {
            if !content.contains(needle) {
                violations.push(format!("{path}: missing section marker: {needle}"));
            }
        }

        if !content.to_lowercase().contains(&case_id.to_lowercase()) {
            violations.push(format!("{path}: does not mention case id {case_id}"));
        }

        if !content.contains(UNCHECKED_ITEM) {
            violations.push(format!(
                "{path}: verification checklist has no checkboxes ('{UNCHECKED_ITEM} ...')"
            ));
        }

        Ok(())
    }
}
