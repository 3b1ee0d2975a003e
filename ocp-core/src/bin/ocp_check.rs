//! OCP Check CLI - validate deployment manifests offline
//!
//! Runs the security denylist and the compliance validator over manifest
//! files, the same checks the MCP server applies.
//!
//! Usage:
//!     ocp-check deploy.yaml
//!     ocp-check --json k8s/*.yaml
//!     ocp-check --security-only deploy.json
//!     ocp-check --list-rules
//!
//! Exit status: 0 when every file passes, 1 when any file has security
//! violations or compliance errors, 2 when a file cannot be read or parsed.

use std::path::PathBuf;

use clap::Parser;
use ocp_core::{ComplianceValidator, Manifest, SecurityChecker, SecurityRule, ValidationResult};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ocp-check")]
#[command(about = "Check deployment manifests against OpenShift security and compliance rules")]
#[command(version)]
struct Args {
    /// Manifest files (YAML, or JSON with a .json extension)
    #[arg(required_unless_present = "list_rules")]
    files: Vec<PathBuf>,

    /// Output as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Skip the compliance validator
    #[arg(long)]
    security_only: bool,

    /// Print the security rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Verbose output (log the checker's summary warning for each failing file)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    security: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compliance: Option<ValidationResult>,
}

impl FileReport {
    fn failed(&self) -> bool {
        !self.security.is_empty()
            || self
                .compliance
                .as_ref()
                .is_some_and(|c| !c.is_compliant())
    }
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "ocp_core=warn" } else { "ocp_core=error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.list_rules {
        for rule in SecurityRule::ALL {
            println!("{:<22} {}", rule.key(), rule.description());
        }
        return;
    }

    let checker = SecurityChecker::new();
    let validator = ComplianceValidator::new();
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let manifest = match Manifest::from_path(path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Error loading {}: {}", path.display(), e);
                std::process::exit(2);
            }
        };

        reports.push(FileReport {
            file: path.display().to_string(),
            security: checker.check(&manifest),
            compliance: (!args.security_only).then(|| validator.validate(&manifest)),
        });
    }

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                std::process::exit(2);
            }
        }
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    if reports.iter().any(FileReport::failed) {
        std::process::exit(1);
    }
}

fn print_report(report: &FileReport) {
    println!("{}", report.file);

    if report.security.is_empty() {
        println!("  security: PASS");
    } else {
        println!("  security: FAIL ({} violations)", report.security.len());
        for violation in &report.security {
            println!("    - {}", violation);
        }
    }

    if let Some(compliance) = &report.compliance {
        println!("  compliance: {}", compliance.summary());
        for error in &compliance.errors {
            println!("    error: {}", error);
        }
        for warning in &compliance.warnings {
            println!("    warning: {}", warning);
        }
    }
}
