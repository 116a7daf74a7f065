//! # guardian-cli
//!
//! Command-line interface for the Guardian triage-and-proposal pipeline:
//! - `guardian intake` — validate signals and synthesize care-cases
//! - `guardian propose` — open change requests for eligible care-cases
//! - `guardian validate-pr` — enforce the structural contract on an
//!   incoming change request
//! - `guardian issue` — render the review-issue title/body for a care-case
//!
//! Every hard failure exits non-zero with an itemized error list; success
//! paths exit zero with a one-line summary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Guardian CLI — triage signals and propose reviewable patches.
#[derive(Parser)]
#[command(name = "guardian", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate signal documents and synthesize care-cases.
    Intake {
        /// Signal JSON files to ingest.
        signals: Vec<PathBuf>,
        /// Directory for generated care-case records.
        #[arg(long, default_value = "generated")]
        out_dir: PathBuf,
        /// Load schema contracts from this directory instead of the
        /// bundled copies.
        #[arg(long)]
        schema_dir: Option<PathBuf>,
    },
    /// Open change requests for eligible care-cases.
    Propose {
        /// Directory of generated care-case records.
        #[arg(long, default_value = "generated")]
        cases_dir: PathBuf,
        /// Repository working directory.
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
        /// Workflow configuration file.
        #[arg(long, default_value = "guardian.toml")]
        config: PathBuf,
    },
    /// Validate an incoming change request against the guardian contract.
    ValidatePr {
        /// Base revision of the change request.
        #[arg(long)]
        base: String,
        /// Head revision of the change request.
        #[arg(long)]
        head: String,
        /// Head branch name of the change request.
        #[arg(long)]
        branch: String,
        /// Repository working directory (checked out at the head).
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
    },
    /// Render the review-issue title or body for a care-case file.
    Issue {
        /// Print the issue title.
        #[arg(long)]
        title: bool,
        /// Print the issue body.
        #[arg(long)]
        body: bool,
        /// Care-case JSON file.
        case_file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-consumable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("guardian_case=info".parse()?)
                .add_directive("guardian_propose=info".parse()?)
                .add_directive("guardian_validate=info".parse()?)
                .add_directive("guardian_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Intake {
            signals,
            out_dir,
            schema_dir,
        } => commands::intake::execute(&signals, &out_dir, schema_dir.as_deref()),
        Commands::Propose {
            cases_dir,
            work_dir,
            config,
        } => commands::propose::execute(&cases_dir, &work_dir, &config),
        Commands::ValidatePr {
            base,
            head,
            branch,
            work_dir,
        } => commands::validate_pr::execute(base, head, branch, &work_dir),
        Commands::Issue {
            title,
            body,
            case_file,
        } => commands::issue::execute(title, body, &case_file),
    }
}
