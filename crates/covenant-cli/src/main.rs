//! Capability contract checker CLI.
//!
//! Provides the `covenant` binary, which loads a JSON manifest of contracts
//! and classes and reports which classes satisfy their contracts.
//!
//! Logging goes to stderr. The filter is read from `COVENANT_LOG` and falls
//! back to the `-v` count (warn, info, debug, trace).
//!
//! Exit codes: 0 = all checks passed, 1 = contract violation or predicate
//! false, 2 = manifest semantic error, 3 = I/O or parse error, 4 = invalid
//! command-line arguments.

mod error;
mod manifest;
mod report;

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use covenant_core::{ConstructOptions, GuardTiming};

use crate::error::CliError;
use crate::manifest::Manifest;

/// Exit code for arguments clap rejects.
const USAGE_ERROR: i32 = 4;

/// Capability contract checker.
#[derive(Debug, Parser)]
#[command(name = "covenant", about = "Capability contract checker")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Instantiate classes and report contract violations as JSON.
    Check {
        /// Path to the manifest file.
        manifest: PathBuf,

        /// Only check this class.
        #[arg(short, long)]
        class: Option<String>,

        /// When guards run: deferred (after full construction) or eager.
        #[arg(short, long, default_value = "deferred", value_parser = GuardTiming::from_str)]
        timing: GuardTiming,
    },

    /// Test whether a class's prototype chain satisfies a contract.
    Satisfies {
        manifest: PathBuf,

        #[arg(long)]
        contract: String,

        #[arg(long)]
        class: String,
    },

    /// Print the effective capability set of a class.
    Capabilities {
        manifest: PathBuf,

        #[arg(long)]
        class: String,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here and are not failures.
            let code = if e.use_stderr() { USAGE_ERROR } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    let exit_code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("COVENANT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();
}

/// Executes a subcommand, returning its exit code.
fn run(command: Commands) -> Result<i32, CliError> {
    match command {
        Commands::Check {
            manifest,
            class,
            timing,
        } => {
            let manifest = Manifest::load(&manifest)?;
            let registry = manifest.build_registry()?;
            let report = report::check(&registry, class.as_deref(), &ConstructOptions { timing })?;

            print_json(&report);
            Ok(if report.has_violations() { 1 } else { 0 })
        }
        Commands::Satisfies {
            manifest,
            contract,
            class,
        } => {
            let manifest = Manifest::load(&manifest)?;
            let registry = manifest.build_registry()?;
            let satisfied = report::satisfies(&manifest, &registry, &contract, &class)?;
            println!("{}", satisfied);
            Ok(if satisfied { 0 } else { 1 })
        }
        Commands::Capabilities { manifest, class } => {
            let manifest = Manifest::load(&manifest)?;
            let registry = manifest.build_registry()?;
            print_json(&report::capabilities(&registry, &class)?);
            Ok(0)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    fn manifest_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn check(manifest: &NamedTempFile, timing: GuardTiming) -> Result<i32, CliError> {
        run(Commands::Check {
            manifest: manifest.path().to_path_buf(),
            class: None,
            timing,
        })
    }

    /// Exit code `run` would end the process with.
    fn exit_code(result: Result<i32, CliError>) -> i32 {
        result.unwrap_or_else(|e| e.exit_code())
    }

    const SATISFIED: &str = r#"{
        "contracts": { "Worker": ["doWork"] },
        "classes": [ { "name": "Impl", "extends": "Worker", "instance_methods": ["doWork"] } ]
    }"#;

    #[test]
    fn check_passes_with_zero() {
        let file = manifest_file(SATISFIED);
        assert_eq!(exit_code(check(&file, GuardTiming::Deferred)), 0);
    }

    #[test]
    fn check_violation_exits_one() {
        let file = manifest_file(SATISFIED);
        // The instance method is attached after an eager guard has run.
        assert_eq!(exit_code(check(&file, GuardTiming::Eager)), 1);
    }

    #[test]
    fn duplicate_class_exits_two() {
        let file = manifest_file(
            r#"{ "classes": [ { "name": "A" }, { "name": "A" } ] }"#,
        );
        let result = check(&file, GuardTiming::Deferred);
        assert!(matches!(result, Err(CliError::Core(_))));
        assert_eq!(exit_code(result), 2);
    }

    #[test]
    fn unknown_class_filter_exits_two() {
        let file = manifest_file(SATISFIED);
        let result = run(Commands::Check {
            manifest: file.path().to_path_buf(),
            class: Some("Nope".into()),
            timing: GuardTiming::Deferred,
        });
        assert_eq!(exit_code(result), 2);
    }

    #[test]
    fn unreadable_or_malformed_manifest_exits_three() {
        let missing = run(Commands::Check {
            manifest: PathBuf::from("/definitely/not/here.json"),
            class: None,
            timing: GuardTiming::Deferred,
        });
        assert_eq!(exit_code(missing), 3);

        let file = manifest_file("{ not json");
        assert_eq!(exit_code(check(&file, GuardTiming::Deferred)), 3);
    }

    #[test]
    fn satisfies_false_exits_one() {
        let file = manifest_file(SATISFIED);
        let result = run(Commands::Satisfies {
            manifest: file.path().to_path_buf(),
            contract: "Worker".into(),
            class: "Impl".into(),
        });
        assert_eq!(exit_code(result), 1);
    }

    #[test]
    fn timing_is_parsed_by_clap() {
        let cli = Cli::try_parse_from(["covenant", "check", "m.json", "--timing", "eager"]).unwrap();
        match cli.command {
            Commands::Check { timing, .. } => assert_eq!(timing, GuardTiming::Eager),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["covenant", "check", "m.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Check {
                timing: GuardTiming::Deferred,
                ..
            }
        ));
    }

    #[test]
    fn invalid_timing_is_a_usage_error() {
        let err = Cli::try_parse_from(["covenant", "check", "m.json", "--timing", "later"])
            .unwrap_err();
        assert!(err.use_stderr());
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
