//! Catalog → synthesis → export driver shared by the CLI commands

use crate::export::{exporter_for, format_sources, write_files, ExportFormat, ExportOptions, ExportSummary};
use crate::resource::{load_catalog, DeclaredTypes};
use crate::settings::Settings;
use crate::synth::{synthesize_catalog, CatalogReport, SynthesisOptions, SynthesizedResource};
use std::path::{Path, PathBuf};

/// Default parent of generated output when `--output` is not given
pub const DEFAULT_OUTPUT_ROOT: &str = "generated";

/// Options of a generate run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Catalog file (YAML or JSON)
    pub catalog: PathBuf,
    /// Output directory (default: `generated/{title}`)
    pub output: Option<PathBuf>,
    /// Explicit settings file
    pub config: Option<PathBuf>,
    /// Overrides the `exporter` setting
    pub format: Option<ExportFormat>,
    pub force: bool,
    pub dry_run: bool,
    /// Log every synthesized operation at info
    pub verbose: bool,
    /// Run rustfmt over written `.rs` files
    pub format_code: bool,
}

/// A loaded and synthesized catalog
#[derive(Debug, Clone)]
pub struct SynthesizedCatalog {
    /// Slugified catalog title
    pub title: String,
    pub settings: Settings,
    pub report: CatalogReport,
}

/// What a generate run produced
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub output_dir: PathBuf,
    pub format: ExportFormat,
    pub summary: ExportSummary,
    pub report: CatalogReport,
}

/// Load a catalog, resolve its settings and synthesize every resource
pub fn synthesize_catalog_file(
    catalog_path: &Path,
    config: Option<&Path>,
    verbose: bool,
) -> anyhow::Result<SynthesizedCatalog> {
    let catalog = load_catalog(catalog_path)?;
    let settings = Settings::resolve(catalog_path, config, catalog.settings.as_ref())?;
    let types = DeclaredTypes::new(catalog.types);
    let options = SynthesisOptions::verbose(settings.verbose || verbose);
    let report = synthesize_catalog(&types, &settings, &options);
    Ok(SynthesizedCatalog {
        title: catalog.title,
        settings,
        report,
    })
}

/// Generate output for every resource of a catalog
///
/// Resources that fail to configure are reported in the outcome and left out
/// of the output; the run itself only fails on I/O, parse or render errors.
pub fn generate_from_catalog(options: &GenerateOptions) -> anyhow::Result<GenerateOutcome> {
    let synthesized =
        synthesize_catalog_file(&options.catalog, options.config.as_deref(), options.verbose)?;
    let format = options.format.unwrap_or(synthesized.settings.exporter);
    let output_dir = options
        .output
        .clone()
        .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_ROOT).join(&synthesized.title));

    tracing::info!(
        catalog = %options.catalog.display(),
        output = %output_dir.display(),
        %format,
        resources = synthesized.report.resources.len(),
        operations = synthesized.report.operation_count(),
        "generating"
    );

    let files = exporter_for(format).render(
        &synthesized.title,
        &synthesized.settings,
        &synthesized.report.resources,
    )?;
    let summary = write_files(
        &output_dir,
        &files,
        &ExportOptions {
            force: options.force,
            dry_run: options.dry_run,
        },
    )?;

    if format == ExportFormat::Rust && options.format_code && !options.dry_run {
        let sources: Vec<PathBuf> = summary
            .written
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
            .cloned()
            .collect();
        if let Err(err) = format_sources(&sources) {
            tracing::warn!(error = %err, "rustfmt failed; generated sources left unformatted");
        }
    }

    Ok(GenerateOutcome {
        output_dir,
        format,
        summary,
        report: synthesized.report,
    })
}

/// Human-readable operation table of one resource
pub fn operation_table(resource: &SynthesizedResource) -> String {
    let operations = &resource.operations;
    let mut out = format!(
        "{} ({}) → {}\n",
        operations.controller_name,
        operations.resource_type_id,
        resource.configuration.route_base_path
    );
    for op in &operations.operations {
        out.push_str(&format!(
            "  {:<28} {:<40} {:>3}",
            op.operation_name,
            op.route_label(),
            op.response.status_on_success.as_u16()
        ));
        if let Some(security) = &op.security {
            out.push_str(&format!("  {security}"));
        }
        out.push('\n');
    }
    out
}
