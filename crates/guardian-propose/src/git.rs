// git.rs — GitBackend: ReviewBackend over git and the gh CLI.
//
// Command construction mirrors the queries the controller needs:
// branch existence via `git ls-remote`, request existence via
// `gh pr list --state all`, request creation via `gh pr create`.
// Every failed command surfaces its full command line and captured
// output, since that is usually the only diagnostic an operator gets.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::backend::{ChangeRequest, RepoContext, ReviewBackend};
use crate::config::CommitIdentity;
use crate::error::{ProposeError, Result};

/// ReviewBackend implementation driving `git` and `gh` subprocesses in a
/// working directory.
pub struct GitBackend {
    work_dir: PathBuf,
}

impl GitBackend {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Run a command in the working directory, failing on non-zero exit.
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| ProposeError::IoError {
                path: self.work_dir.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProposeError::CommandFailed {
                command: format!("{} {}", program, args.join(" ")),
                output: format!(
                    "{}{}",
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr)
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run a command where a non-zero exit is an answer, not a failure.
    /// Returns (success, trimmed stdout).
    fn run_status(&self, program: &str, args: &[&str]) -> Result<(bool, String)> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| ProposeError::IoError {
                path: self.work_dir.display().to_string(),
                source,
            })?;

        Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        ))
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        self.run("git", args)
    }

    fn gh(&self, args: &[&str]) -> Result<String> {
        self.run("gh", args)
    }
}

impl ReviewBackend for GitBackend {
    fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn default_branch(&self) -> Result<String> {
        // The review system knows; fall back to "main" if it can't say.
        let (_, name) = self.run_status(
            "gh",
            &[
                "repo",
                "view",
                "--json",
                "defaultBranchRef",
                "--jq",
                ".defaultBranchRef.name",
            ],
        )?;
        if name.is_empty() {
            Ok("main".to_string())
        } else {
            Ok(name)
        }
    }

    fn configure_identity(&self, identity: &CommitIdentity) -> Result<()> {
        self.git(&["config", "user.name", &identity.name])?;
        self.git(&["config", "user.email", &identity.email])?;
        Ok(())
    }

    fn repo_context(&self) -> RepoContext {
        let repo = self
            .run_status(
                "gh",
                &["repo", "view", "--json", "nameWithOwner", "--jq", ".nameWithOwner"],
            )
            .ok()
            .and_then(|(ok, out)| (ok && !out.is_empty()).then_some(out));
        let actor = self
            .run_status("gh", &["api", "user", "--jq", ".login"])
            .ok()
            .and_then(|(ok, out)| (ok && !out.is_empty()).then_some(out));
        RepoContext { repo, actor }
    }

    fn change_request_exists(&self, head_branch: &str) -> Result<bool> {
        let output = self.gh(&[
            "pr",
            "list",
            "--head",
            head_branch,
            "--state",
            "all",
            "--json",
            "number",
        ])?;
        Ok(!matches!(output.as_str(), "" | "[]"))
    }

    fn remote_branch_exists(&self, branch: &str) -> Result<bool> {
        let output = self.git(&["ls-remote", "--heads", "origin", branch])?;
        Ok(!output.is_empty())
    }

    fn create_branch_from(&self, branch: &str, base: &str) -> Result<()> {
        self.git(&["fetch", "origin", base])?;
        self.git(&["checkout", "-B", branch, &format!("origin/{base}")])?;
        Ok(())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.git(&["add", &path.to_string_lossy()])?;
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        // `git diff --cached --quiet` exits 1 when something is staged.
        let (clean, _) = self.run_status("git", &["diff", "--cached", "--quiet"])?;
        Ok(!clean)
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message])?;
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<()> {
        self.git(&["push", "-u", "origin", branch])?;
        Ok(())
    }

    fn open_change_request(&self, request: &ChangeRequest) -> Result<()> {
        self.gh(&[
            "pr",
            "create",
            "--title",
            &request.title,
            "--body",
            &request.body,
            "--base",
            &request.base,
            "--head",
            &request.head,
        ])?;
        Ok(())
    }

    fn change_request_url(&self, head_branch: &str) -> Result<Option<String>> {
        let (ok, url) = self.run_status(
            "gh",
            &[
                "pr",
                "list",
                "--head",
                head_branch,
                "--state",
                "all",
                "--json",
                "url",
                "--jq",
                ".[0].url",
            ],
        )?;
        Ok((ok && !url.is_empty()).then_some(url))
    }

    fn add_label(&self, url: &str, label: &str) -> Result<()> {
        self.gh(&["pr", "edit", url, "--add-label", label])?;
        Ok(())
    }

    fn comment(&self, url: &str, body: &str) -> Result<()> {
        self.gh(&["pr", "comment", url, "--body", body])?;
        Ok(())
    }

    fn restore_branch(&self, base: &str) -> Result<()> {
        self.git(&["checkout", "-B", base, &format!("origin/{base}")])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Exercises only the pieces that don't need a remote: identity
    // configuration and staged-change detection against a local repo.
    fn init_repo(dir: &Path) {
        for args in [
            vec!["init"],
            vec!["config", "user.name", "Test User"],
            vec!["config", "user.email", "test@example.com"],
        ] {
            Command::new("git")
                .args(&args)
                .current_dir(dir)
                .output()
                .unwrap();
        }
        std::fs::write(dir.join("README.md"), "# Test\n").unwrap();
        Command::new("git")
            .args(["add", "."])
            .current_dir(dir)
            .output()
            .unwrap();
        Command::new("git")
            .args(["commit", "-m", "Initial commit"])
            .current_dir(dir)
            .output()
            .unwrap();
    }

    #[test]
    fn staged_change_detection() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let backend = GitBackend::new(dir.path());

        assert!(!backend.has_staged_changes().unwrap());

        std::fs::write(dir.path().join("new.txt"), "content\n").unwrap();
        backend.stage(Path::new("new.txt")).unwrap();
        assert!(backend.has_staged_changes().unwrap());
    }

    #[test]
    fn configure_identity_sets_git_config() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let backend = GitBackend::new(dir.path());

        backend
            .configure_identity(&CommitIdentity::default())
            .unwrap();
        let name = backend.git(&["config", "user.name"]).unwrap();
        assert_eq!(name, "guardian-bot");
    }

    #[test]
    fn failed_command_reports_command_and_output() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());
        let backend = GitBackend::new(dir.path());

        let err = backend.git(&["checkout", "no-such-branch"]).unwrap_err();
        match err {
            ProposeError::CommandFailed { command, output } => {
                assert!(command.starts_with("git checkout"));
                assert!(!output.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
