//! # Catalog Linter Module
//!
//! Runs the resolution and synthesis passes over a resource catalog without
//! emitting anything and reports what a reviewer should look at.
//!
//! ## Checks Performed
//!
//! 1. **Configuration errors** - missing entity, unknown entity type, ambiguous DTO,
//!    duplicate relation names, unreadable marker values (errors)
//! 2. **Relation resolution** - related types or identifier markers that could not be
//!    resolved and fell back to defaults (warnings)
//! 3. **Empty surfaces** - resources whose every operation is already hand-written (info)
//! 4. **Undeclared accessors** - relation accessors the owning entity does not declare (info)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use brrtcrud::linter::{lint_catalog, LintSeverity};
//! use std::path::Path;
//!
//! let issues = lint_catalog(Path::new("resources.yaml"), None)?;
//! for issue in &issues {
//!     eprintln!("[{}] {}: {}", issue.severity, issue.location, issue.message);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::error::ConfigurationError;
use crate::resource::{load_catalog, DeclaredTypes, ResourceIntrospector};
use crate::settings::Settings;
use crate::synth::{synthesize_catalog, CatalogReport, SynthesisOptions, Verbosity};
use std::fmt;
use std::path::Path;

#[cfg(test)]
mod tests;

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LintSeverity {
    /// Error - The resource cannot be synthesized
    Error,
    /// Warning - Synthesis fell back to defaults
    Warning,
    /// Info - Best practice suggestion
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintSeverity::Error => write!(f, "ERROR"),
            LintSeverity::Warning => write!(f, "WARNING"),
            LintSeverity::Info => write!(f, "INFO"),
        }
    }
}

/// A lint issue found while resolving a resource catalog
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LintIssue {
    /// Where the issue occurred (e.g., "shop.OrderModel#products")
    pub location: String,
    /// Severity of the issue
    pub severity: LintSeverity,
    /// Type of lint issue (e.g., "unresolved_related_type")
    pub kind: String,
    /// Human-readable description of the problem
    pub message: String,
    /// Optional suggestion for how to fix it
    pub suggestion: Option<String>,
}

impl LintIssue {
    /// Create a new lint issue
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Shorthand for a warning-level issue
    pub fn warning(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(location, LintSeverity::Warning, kind, message)
    }

    /// Add a suggestion for fixing the issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl From<&ConfigurationError> for LintIssue {
    fn from(err: &ConfigurationError) -> Self {
        let (location, kind, suggestion) = match err {
            ConfigurationError::MissingEntity { resource } => (
                resource.clone(),
                "missing_entity",
                "Add an `entity` value to the CrudResource marker",
            ),
            ConfigurationError::UnknownType { resource, .. } => (
                resource.clone(),
                "unknown_entity_type",
                "Declare the entity under `types` or fix the type id",
            ),
            ConfigurationError::AmbiguousDto { resource, .. } => (
                resource.clone(),
                "ambiguous_dto",
                "Use the fully qualified DTO type id",
            ),
            ConfigurationError::DuplicateRelation { resource, .. } => (
                resource.clone(),
                "duplicate_relation",
                "Give one of the members a distinct `name` on its Relation marker",
            ),
            ConfigurationError::InvalidMarkerValue { location, .. } => (
                location.clone(),
                "invalid_marker_value",
                "Check the marker value against the supported values",
            ),
        };
        LintIssue::new(location, LintSeverity::Error, kind, err.to_string())
            .with_suggestion(suggestion)
    }
}

/// Lint a catalog file
///
/// Settings are resolved the same way `generate` resolves them: an explicit
/// config file, or `brrtcrud.toml` next to the catalog, then the catalog's own
/// `settings` section, then the environment.
pub fn lint_catalog(catalog_path: &Path, config: Option<&Path>) -> anyhow::Result<Vec<LintIssue>> {
    let catalog = load_catalog(catalog_path)?;
    let settings = Settings::resolve(catalog_path, config, catalog.settings.as_ref())?;
    let types = DeclaredTypes::new(catalog.types);
    let options = SynthesisOptions {
        verbosity: Verbosity::Quiet,
    };
    let report = synthesize_catalog(&types, &settings, &options);
    Ok(lint_report(&types, &report))
}

/// Turn a catalog report into lint issues
pub fn lint_report(types: &dyn ResourceIntrospector, report: &CatalogReport) -> Vec<LintIssue> {
    let mut issues: Vec<LintIssue> = report
        .failures
        .iter()
        .map(|failure| LintIssue::from(&failure.error))
        .collect();
    issues.extend(report.issues.iter().cloned());

    for resource in &report.resources {
        let config = &resource.configuration;
        if resource.operations.operations.is_empty() {
            issues.push(
                LintIssue::new(
                    config.controller_name.clone(),
                    LintSeverity::Info,
                    "no_operations",
                    "Every operation of this resource is already hand-written",
                )
                .with_suggestion("Drop the CrudResource marker or remove the hand-written routes"),
            );
        }

        let methods = types.methods(&config.resource_type_id);
        if methods.is_empty() {
            continue;
        }
        for relation in &config.relations {
            for accessor in relation.accessors.required_for(relation.cardinality) {
                if !methods.iter().any(|m| m.name == accessor) {
                    issues.push(LintIssue::new(
                        format!("{}#{}", config.resource_type_id, relation.relation_name),
                        LintSeverity::Info,
                        "accessor_not_declared",
                        format!("Accessor '{accessor}' is not declared on the entity"),
                    ));
                }
            }
        }
    }

    issues
}

/// Print lint issues in a human-readable format
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let errors: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .collect();
    let warnings: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Warning)
        .collect();
    let infos: Vec<_> = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Info)
        .collect();

    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        errors.len(),
        warnings.len(),
        infos.len()
    );

    print_group("❌ Errors (must fix):", &errors);
    print_group("⚠️  Warnings (should fix):", &warnings);
    print_group("ℹ️  Info (best practices):", &infos);
}

fn print_group(title: &str, issues: &[&LintIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("{title}");
    for issue in issues {
        println!("   [{}] {}", issue.kind, issue.location);
        println!("      {}", issue.message);
        if let Some(suggestion) = &issue.suggestion {
            println!("      💡 Suggestion: {}", suggestion);
        }
    }
    println!();
}

/// Fail if there are any error-level lint issues
pub fn fail_if_errors(issues: &[LintIssue]) -> anyhow::Result<()> {
    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("{errors} lint error(s) found");
    }
    Ok(())
}
