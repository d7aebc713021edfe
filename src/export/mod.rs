//! # Export Module
//!
//! Emission adapters turning synthesized resources into files.
//!
//! | Format | Output |
//! |---|---|
//! | `rust` | one controller module per resource plus `mod.rs` (Askama templates) |
//! | `json` | `generated-rest.json` snapshot of settings and resources |
//! | `yaml` | `generated-rest.yaml` snapshot of settings and resources |
//!
//! Exporters only render; [`write_files`] owns the filesystem and honors
//! `force` and `dry_run`.

mod snapshot;
mod source;

pub use snapshot::{JsonExporter, Snapshot, YamlExporter, SNAPSHOT_FILE_STEM};
pub use source::{format_sources, render_step, RustExporter};

use crate::settings::Settings;
use crate::synth::SynthesizedResource;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Output format of the generate command
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Rust controller modules
    #[default]
    Rust,
    /// JSON configuration snapshot
    Json,
    /// YAML configuration snapshot
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Rust => write!(f, "rust"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// One rendered output file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Emission adapter
pub trait Exporter {
    fn format(&self) -> ExportFormat;

    /// Render every output file in memory
    fn render(
        &self,
        catalog: &str,
        settings: &Settings,
        resources: &[SynthesizedResource],
    ) -> anyhow::Result<Vec<RenderedFile>>;
}

/// Exporter for a format
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Rust => Box::new(RustExporter),
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Yaml => Box::new(YamlExporter),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Overwrite existing files
    pub force: bool,
    /// Report what would be written without touching the disk
    pub dry_run: bool,
}

/// What [`write_files`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Write rendered files under `output_dir`
///
/// Existing files are kept unless `force`. With `dry_run` nothing is created,
/// and every file that would be written is reported as written.
pub fn write_files(
    output_dir: &Path,
    files: &[RenderedFile],
    options: &ExportOptions,
) -> anyhow::Result<ExportSummary> {
    let mut summary = ExportSummary::default();
    for file in files {
        let path = output_dir.join(&file.relative_path);
        if path.exists() && !options.force {
            println!("⚠️  Skipping existing file: {path:?} (use --force to overwrite)");
            summary.skipped.push(path);
            continue;
        }
        if options.dry_run {
            println!("📝 Would write {path:?} ({} bytes)", file.contents.len());
            summary.written.push(path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {parent:?}"))?;
        }
        fs::write(&path, &file.contents).with_context(|| format!("Failed to write {path:?}"))?;
        println!("✅ Generated {path:?}");
        summary.written.push(path);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn file(name: &str, contents: &str) -> RenderedFile {
        RenderedFile {
            relative_path: PathBuf::from(name),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn existing_files_need_force() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "old").unwrap();
        let files = [file("a.rs", "new"), file("nested/b.rs", "b")];

        let summary = write_files(dir.path(), &files, &ExportOptions::default()).unwrap();
        assert_eq!(summary.skipped, vec![dir.path().join("a.rs")]);
        assert_eq!(fs::read_to_string(dir.path().join("a.rs")).unwrap(), "old");
        assert_eq!(
            fs::read_to_string(dir.path().join("nested/b.rs")).unwrap(),
            "b"
        );

        let forced = ExportOptions {
            force: true,
            dry_run: false,
        };
        write_files(dir.path(), &files, &forced).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.rs")).unwrap(), "new");
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let options = ExportOptions {
            force: false,
            dry_run: true,
        };
        let summary = write_files(dir.path(), &[file("x.json", "{}")], &options).unwrap();
        assert_eq!(summary.written.len(), 1);
        assert!(!dir.path().join("x.json").exists());
    }

    #[test]
    fn exporter_matches_format() {
        for format in [ExportFormat::Rust, ExportFormat::Json, ExportFormat::Yaml] {
            assert_eq!(exporter_for(format).format(), format);
        }
    }
}
