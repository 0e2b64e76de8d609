//! k8s-export CLI entry point
//!
//! A minimal shim: parse-and-run lives in the cli module; main only prints
//! the fatal error to stderr and exits non-zero.

use k8s_export::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("k8s-export: {}", e);
        std::process::exit(1);
    }
}
