//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use crate::export::ExportFormat;
use clap::Parser;

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "brrtcrud-gen",
        "lint",
        "--spec",
        "catalog.yaml",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            spec,
            config,
            fail_on_error,
            errors_only,
        } => {
            assert_eq!(spec.to_string_lossy(), "catalog.yaml");
            assert!(config.is_none());
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["brrtcrud-gen", "generate", "--spec", "catalog.yaml"]).unwrap();

    match cli.command {
        Commands::Generate {
            output,
            format,
            force,
            dry_run,
            verbose,
            no_format,
            ..
        } => {
            assert!(output.is_none());
            assert!(format.is_none());
            assert!(!force && !dry_run && !verbose && !no_format);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_format_values() {
    for (arg, expected) in [
        ("rust", ExportFormat::Rust),
        ("json", ExportFormat::Json),
        ("yaml", ExportFormat::Yaml),
    ] {
        let cli = Cli::try_parse_from([
            "brrtcrud-gen",
            "generate",
            "--spec",
            "catalog.yaml",
            "--format",
            arg,
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { format, .. } => assert_eq!(format, Some(expected)),
            _ => panic!("Expected Generate command"),
        }
    }

    assert!(Cli::try_parse_from([
        "brrtcrud-gen",
        "generate",
        "--spec",
        "catalog.yaml",
        "--format",
        "xml",
    ])
    .is_err());
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec![
            "brrtcrud-gen",
            "generate",
            "--spec",
            "catalog.yaml",
            "--output",
            "out",
            "--force",
            "--dry-run",
            "--no-format",
        ],
        vec!["brrtcrud-gen", "inspect", "--spec", "catalog.yaml"],
        vec![
            "brrtcrud-gen",
            "inspect",
            "--spec",
            "catalog.yaml",
            "--resource",
            "OrderModel",
        ],
        vec!["brrtcrud-gen", "lint", "--spec", "catalog.yaml"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}

#[test]
fn test_spec_is_required() {
    assert!(Cli::try_parse_from(["brrtcrud-gen", "generate"]).is_err());
    assert!(Cli::try_parse_from(["brrtcrud-gen", "serve", "--spec", "x.yaml"]).is_err());
}
