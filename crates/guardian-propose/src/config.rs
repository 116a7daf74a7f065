// config.rs — Proposal workflow configuration.
//
// Identity is explicit configuration handed to the controller, never
// implicit environment state, so runs are reproducible and testable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProposeError;

/// Top-level proposal configuration from guardian.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposeConfig {
    /// Directory (relative to the repository root) where proposal
    /// artifacts live.
    #[serde(default = "default_patches_dir")]
    pub patches_dir: PathBuf,

    /// Branch naming prefix for guardian-authored branches.
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// Labels attached to created change requests (best-effort).
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Commit identity used for guardian commits.
    #[serde(default)]
    pub identity: CommitIdentity,
}

impl Default for ProposeConfig {
    fn default() -> Self {
        Self {
            patches_dir: default_patches_dir(),
            branch_prefix: default_branch_prefix(),
            labels: default_labels(),
            identity: CommitIdentity::default(),
        }
    }
}

impl ProposeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ProposeError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProposeError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ProposeError::ConfigError(e.to_string()))
    }

    /// Try to load config, returning defaults if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Deterministic branch name for a case id.
    pub fn branch_for(&self, case_id: uuid::Uuid) -> String {
        format!("{}{}", self.branch_prefix, case_id)
    }

    /// Repository-relative path of the proposal artifact for a case id.
    pub fn patch_path_for(&self, case_id: uuid::Uuid) -> PathBuf {
        self.patches_dir.join(format!("{case_id}.md"))
    }
}

/// Actor name/email used for guardian commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitIdentity {
    #[serde(default = "default_identity_name")]
    pub name: String,

    #[serde(default = "default_identity_email")]
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            name: default_identity_name(),
            email: default_identity_email(),
        }
    }
}

// Serde default functions
fn default_patches_dir() -> PathBuf {
    PathBuf::from("guardian/patches")
}

fn default_branch_prefix() -> String {
    "guardian/".to_string()
}

fn default_labels() -> Vec<String> {
    vec!["guardian".to_string(), "bot".to_string()]
}

fn default_identity_name() -> String {
    "guardian-bot".to_string()
}

fn default_identity_email() -> String {
    "guardian-bot@users.noreply.github.com".to_string()
}
