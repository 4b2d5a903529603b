//! Unit tests for CLI argument parsing

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::cli::{Cli, Commands, LogFormatArg};
use clap::Parser;

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["dispatchgen", "generate"]).unwrap();
    assert_eq!(cli.log_level, "warn");
    assert_eq!(cli.log_format, LogFormatArg::Pretty);

    match cli.command {
        Commands::Generate {
            config,
            input,
            output,
            function_name,
            dry_run,
            check,
            format,
        } => {
            assert!(config.is_none());
            assert!(input.is_none());
            assert!(output.is_none());
            assert!(function_name.is_none());
            assert!(!dry_run);
            assert!(!check);
            assert!(!format);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_with_flags() {
    let cli = Cli::try_parse_from([
        "dispatchgen",
        "generate",
        "--input",
        "in.rs",
        "-o",
        "out.rs",
        "--function-name",
        "dispatch",
        "--check",
        "--format",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.log_level, "debug");
    assert_eq!(cli.log_format, LogFormatArg::Json);
    match cli.command {
        Commands::Generate {
            input,
            output,
            function_name,
            check,
            format,
            ..
        } => {
            assert_eq!(input.unwrap().to_string_lossy(), "in.rs");
            assert_eq!(output.unwrap().to_string_lossy(), "out.rs");
            assert_eq!(function_name.as_deref(), Some("dispatch"));
            assert!(check);
            assert!(format);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_dry_run_conflicts_with_check() {
    let res = Cli::try_parse_from(["dispatchgen", "generate", "--dry-run", "--check"]);
    assert!(res.is_err());
}

#[test]
fn test_list_command() {
    let cli = Cli::try_parse_from(["dispatchgen", "list", "-i", "collections.rs", "--json"]).unwrap();
    match cli.command {
        Commands::List { input, json, config } => {
            assert_eq!(input.unwrap().to_string_lossy(), "collections.rs");
            assert!(json);
            assert!(config.is_none());
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["dispatchgen"]).is_err());
}
