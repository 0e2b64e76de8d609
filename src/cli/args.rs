//! CLI argument definitions using clap
//!
//! Both path arguments are optional at the clap layer so a missing one
//! produces the usage message with exit code 1 (clap's own required-arg
//! handling exits 2).

use clap::Parser;
use std::path::PathBuf;

use super::errors::CliError;
use crate::export::ExportConfig;

/// Export Kubernetes resources from an etcd database file as YAML
#[derive(Parser, Debug)]
#[command(name = "k8s-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the etcd database file (typically member/snap/db)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Path to the output folder
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Prefix each exported document with a `---` marker
    #[arg(long)]
    pub doc_separator: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Validates the arguments into an immutable run configuration
    pub fn into_config(self) -> Result<ExportConfig, CliError> {
        match (self.db, self.output) {
            (Some(db_path), Some(output_root)) => Ok(ExportConfig {
                db_path,
                output_root,
                doc_separator: self.doc_separator,
            }),
            _ => Err(CliError::MissingArguments),
        }
    }
}
