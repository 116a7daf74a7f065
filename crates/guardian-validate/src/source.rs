// source.rs — ChangeSource: where the validator reads a request's diff.
//
// The validator itself is pure given a changed-file list and file
// contents; this trait seams out git so tests can run entirely in memory.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ValidateError;

/// Read access to a change request's diff and head-side file contents.
pub trait ChangeSource {
    /// Paths changed between `base` and `head`, repository-relative.
    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, ValidateError>;

    /// Contents of a repository-relative file on the head side, or `None`
    /// if it doesn't exist.
    fn read_file(&self, rel_path: &str) -> Result<Option<String>, ValidateError>;
}

/// ChangeSource over a git working tree checked out at the head revision.
pub struct GitChangeSource {
    root: PathBuf,
}

impl GitChangeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ChangeSource for GitChangeSource {
    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, ValidateError> {
        let output = Command::new("git")
            .args(["diff", "--name-only", base, head])
            .current_dir(&self.root)
            .output()
            .map_err(|e| ValidateError::Source(format!("failed to run git diff: {e}")))?;

        if !output.status.success() {
            return Err(ValidateError::Source(format!(
                "git diff --name-only {base} {head} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn read_file(&self, rel_path: &str) -> Result<Option<String>, ValidateError> {
        let path = self.root.join(Path::new(rel_path));
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ValidateError::Source(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }
}
