use crate::export::ExportFormat;
use crate::generate::{generate_from_catalog, operation_table, synthesize_catalog_file, GenerateOptions};
use crate::linter::{fail_if_errors, lint_catalog, print_lint_issues, LintIssue, LintSeverity};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for brrtcrud
///
/// Provides commands for synthesizing CRUD and relation operations from a
/// resource catalog.
#[derive(Parser)]
#[command(name = "brrtcrud-gen")]
#[command(about = "brrtcrud CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for brrtcrud
#[derive(Subcommand)]
pub enum Commands {
    /// Generate controllers (or a configuration snapshot) from a resource catalog
    Generate {
        /// Path to the resource catalog (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Output directory (default: generated/{title})
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; overrides the `exporter` setting
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Settings file (default: brrtcrud.toml next to the catalog)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite existing files
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Perform a dry run: show what would be written without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Log every synthesized operation
        #[arg(short, long, default_value_t = false)]
        verbose: bool,

        /// Skip rustfmt on generated Rust sources
        #[arg(long, default_value_t = false)]
        no_format: bool,
    },
    /// Print the operation table of every resource (or one of them)
    Inspect {
        /// Path to the resource catalog (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Controller name, simple controller name or entity type id
        #[arg(short, long)]
        resource: Option<String>,

        /// Settings file (default: brrtcrud.toml next to the catalog)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Lint a resource catalog
    ///
    /// Reports configuration errors, fallbacks to default identifiers or
    /// types, resources with nothing left to generate and relation
    /// accessors the entity does not declare.
    Lint {
        /// Path to the resource catalog (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Settings file (default: brrtcrud.toml next to the catalog)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with error code if any errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Show only errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
}

/// Parse the process arguments and execute the command
///
/// # Errors
///
/// Returns an error if:
/// - The catalog or settings file cannot be read or parsed
/// - Rendering or writing output fails
/// - `inspect --resource` names no synthesized resource
/// - `lint --fail-on-error` finds error-level issues
pub fn run_cli() -> anyhow::Result<()> {
    execute(Cli::parse())
}

/// Execute an already parsed command line
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            spec,
            output,
            format,
            config,
            force,
            dry_run,
            verbose,
            no_format,
        } => {
            let outcome = generate_from_catalog(&GenerateOptions {
                catalog: spec,
                output,
                config,
                format,
                force,
                dry_run,
                verbose,
                format_code: !no_format,
            })?;

            for failure in &outcome.report.failures {
                println!("❌ {}: {}", failure.declaring_type, failure.error);
            }
            println!(
                "📦 {} resource(s), {} operation(s) → {:?} ({}): {} written, {} skipped",
                outcome.report.resources.len(),
                outcome.report.operation_count(),
                outcome.output_dir,
                outcome.format,
                outcome.summary.written.len(),
                outcome.summary.skipped.len()
            );
            Ok(())
        }
        Commands::Inspect {
            spec,
            resource,
            config,
        } => {
            let synthesized = synthesize_catalog_file(&spec, config.as_deref(), false)?;
            let report = &synthesized.report;
            match resource {
                Some(name) => {
                    let found = report
                        .resource(&name)
                        .ok_or_else(|| anyhow::anyhow!("No synthesized resource named '{name}'"))?;
                    print!("{}", operation_table(found));
                }
                None => {
                    for found in &report.resources {
                        println!("{}", operation_table(found));
                    }
                    for failure in &report.failures {
                        println!("❌ {}: {}", failure.declaring_type, failure.error);
                    }
                }
            }
            Ok(())
        }
        Commands::Lint {
            spec,
            config,
            fail_on_error,
            errors_only,
        } => {
            let issues = lint_catalog(&spec, config.as_deref())?;
            let shown: Vec<LintIssue> = if errors_only {
                issues
                    .into_iter()
                    .filter(|i| i.severity == LintSeverity::Error)
                    .collect()
            } else {
                issues
            };
            print_lint_issues(&shown);
            if fail_on_error {
                fail_if_errors(&shown)?;
            }
            Ok(())
        }
    }
}
