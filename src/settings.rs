//! # Settings Module
//!
//! Global naming, wrapping and collaborator defaults shared by every resource in
//! a synthesis pass. Settings are read-only once a pass starts.
//!
//! ## Sources
//!
//! Later sources override earlier ones, field by field:
//!
//! 1. Built-in defaults ([`Settings::default`])
//! 2. `brrtcrud.toml` next to the catalog, or an explicit `--config` path
//! 3. The catalog's own `settings:` section
//! 4. Environment variables
//!
//! ## Environment Variables
//!
//! | Variable | Field | Example |
//! |---|---|---|
//! | `BRRTCRUD_CLASS_PREFIX` | `class_name_prefix` | `Generated` |
//! | `BRRTCRUD_CLASS_PATTERN` | `class_name_pattern` | `{PREFIX}{NAME}` |
//! | `BRRTCRUD_DATA_WRAPPER` | `data_wrapper` | `shop.DataWrapper` or `none` |
//! | `BRRTCRUD_DTO_NAMESPACE` | `dto_namespace` | `shop.dto` |
//! | `BRRTCRUD_INDENT` | `indentation` | number of spaces, e.g. `4` |
//! | `BRRTCRUD_PAGE_SIZE` | `page_size` | `20` |
//! | `BRRTCRUD_VERBOSE` | `verbose` | `true` |
//!
//! ## Example `brrtcrud.toml`
//!
//! ```toml
//! class_name_prefix = "Api"
//! data_wrapper = "shop.DataWrapper"
//! dto_namespace = "shop.dto"
//!
//! [security]
//! role_pattern = "ROLE_{METHOD}_{ENTITY}"
//! inclusive_relations = false
//!
//! [collaborators]
//! data_accessor = "shop.data.JpaDataAccessor"
//! ```

use crate::export::ExportFormat;
use crate::naming::{DEFAULT_DTO_SUFFIX, DEFAULT_ENTITY_SUFFIXES};
use crate::security::SecurityPolicy;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// File name auto-detected next to a catalog
pub const SETTINGS_FILE_NAME: &str = "brrtcrud.toml";

/// Value of `data_wrapper` that disables response wrapping
pub const NO_WRAPPER: &str = "none";

/// Type ids of the externally supplied collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorRefs {
    pub data_accessor: String,
    pub data_mapper: String,
    pub data_merger: String,
    pub search_filter_builder: String,
    pub reference_resolver: String,
}

impl Default for CollaboratorRefs {
    fn default() -> Self {
        Self {
            data_accessor: "DataAccessor".to_string(),
            data_mapper: "DataMapper".to_string(),
            data_merger: "DataMerger".to_string(),
            search_filter_builder: "SearchFilterBuilder".to_string(),
            reference_resolver: "ReferenceResolver".to_string(),
        }
    }
}

/// Partial collaborator override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollaboratorPatch {
    pub data_accessor: Option<String>,
    pub data_mapper: Option<String>,
    pub data_merger: Option<String>,
    pub search_filter_builder: Option<String>,
    pub reference_resolver: Option<String>,
}

impl CollaboratorRefs {
    pub fn apply(&mut self, patch: &CollaboratorPatch) {
        let slots = [
            (&mut self.data_accessor, &patch.data_accessor),
            (&mut self.data_mapper, &patch.data_mapper),
            (&mut self.data_merger, &patch.data_merger),
            (&mut self.search_filter_builder, &patch.search_filter_builder),
            (&mut self.reference_resolver, &patch.reference_resolver),
        ];
        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }
}

/// Global synthesis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Substituted for `{PREFIX}` in `class_name_pattern`
    pub class_name_prefix: String,
    /// Controller name pattern with `{PREFIX}`, `{NAME}`, `{NAME_NORMALIZED}`
    pub class_name_pattern: String,
    /// Default response wrapper type; `None` responds with bare shapes
    pub data_wrapper: Option<String>,
    /// Restricts relation DTO discovery to type ids under this prefix
    pub dto_namespace: Option<String>,
    /// Appended to a normalized entity name to find its DTO
    pub dto_suffix: String,
    /// Stripped from entity names, checked in order
    pub entity_suffixes: Vec<String>,
    /// Indentation unit for emitted source
    pub indentation: String,
    /// Default `size` for search operations
    pub page_size: u32,
    /// Log every contributed and skipped operation at info level
    pub verbose: bool,
    /// Policy for resources without a security marker
    pub security: Option<SecurityPolicy>,
    pub collaborators: CollaboratorRefs,
    pub exporter: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            class_name_prefix: "Generated".to_string(),
            class_name_pattern: "{PREFIX}{NAME}".to_string(),
            data_wrapper: None,
            dto_namespace: None,
            dto_suffix: DEFAULT_DTO_SUFFIX.to_string(),
            entity_suffixes: DEFAULT_ENTITY_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            indentation: "    ".to_string(),
            page_size: 20,
            verbose: false,
            security: None,
            collaborators: CollaboratorRefs::default(),
            exporter: ExportFormat::Rust,
        }
    }
}

/// Partial settings, as found in `brrtcrud.toml` or a catalog `settings:` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub class_name_prefix: Option<String>,
    pub class_name_pattern: Option<String>,
    pub data_wrapper: Option<String>,
    pub dto_namespace: Option<String>,
    pub dto_suffix: Option<String>,
    pub entity_suffixes: Option<Vec<String>>,
    /// Number of spaces per indentation level
    pub indentation: Option<usize>,
    pub page_size: Option<u32>,
    pub verbose: Option<bool>,
    pub security: Option<SecurityPolicy>,
    pub collaborators: Option<CollaboratorPatch>,
    pub exporter: Option<ExportFormat>,
}

/// Map the wrapper sentinel and empty strings to `None`
pub fn normalize_wrapper(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(NO_WRAPPER))
        .map(str::to_string)
}

impl Settings {
    /// Overlay every field the patch sets
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = &patch.class_name_prefix {
            self.class_name_prefix = v.clone();
        }
        if let Some(v) = &patch.class_name_pattern {
            self.class_name_pattern = v.clone();
        }
        if let Some(v) = &patch.data_wrapper {
            self.data_wrapper = normalize_wrapper(Some(v));
        }
        if let Some(v) = &patch.dto_namespace {
            self.dto_namespace = Some(v.clone()).filter(|v| !v.is_empty());
        }
        if let Some(v) = &patch.dto_suffix {
            self.dto_suffix = v.clone();
        }
        if let Some(v) = &patch.entity_suffixes {
            self.entity_suffixes = v.clone();
        }
        if let Some(v) = patch.indentation {
            self.indentation = " ".repeat(v);
        }
        if let Some(v) = patch.page_size {
            self.page_size = v;
        }
        if let Some(v) = patch.verbose {
            self.verbose = v;
        }
        if let Some(v) = &patch.security {
            self.security = Some(v.clone());
        }
        if let Some(v) = &patch.collaborators {
            self.collaborators.apply(v);
        }
        if let Some(v) = patch.exporter {
            self.exporter = v;
        }
    }

    /// Overlay `BRRTCRUD_*` environment variables
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    /// Overlay variables from an arbitrary lookup; unparsable values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let patch = SettingsPatch {
            class_name_prefix: lookup("BRRTCRUD_CLASS_PREFIX"),
            class_name_pattern: lookup("BRRTCRUD_CLASS_PATTERN"),
            data_wrapper: lookup("BRRTCRUD_DATA_WRAPPER"),
            dto_namespace: lookup("BRRTCRUD_DTO_NAMESPACE"),
            indentation: lookup("BRRTCRUD_INDENT").and_then(|s| s.trim().parse().ok()),
            page_size: lookup("BRRTCRUD_PAGE_SIZE").and_then(|s| s.trim().parse().ok()),
            verbose: lookup("BRRTCRUD_VERBOSE").and_then(|s| s.trim().parse().ok()),
            ..SettingsPatch::default()
        };
        self.apply(&patch);
    }

    /// Resolve settings for a catalog from every source
    pub fn resolve(
        catalog_path: &Path,
        explicit_config: Option<&Path>,
        catalog_patch: Option<&SettingsPatch>,
    ) -> anyhow::Result<Self> {
        let mut settings = Settings::default();

        if let Some(path) = explicit_config {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {}", path.display());
            }
        }
        if let Some(path) = resolve_settings_path(explicit_config, catalog_path) {
            if let Some(patch) = load_settings_file(&path)? {
                tracing::debug!(path = %path.display(), "applying settings file");
                settings.apply(&patch);
            }
        }
        if let Some(patch) = catalog_patch {
            settings.apply(patch);
        }
        settings.apply_env();
        Ok(settings)
    }

    /// Security policy carrying this pass's suffix list
    pub fn policy(&self, policy: SecurityPolicy) -> SecurityPolicy {
        policy.with_entity_suffixes(self.entity_suffixes.clone())
    }
}

/// Load a settings file
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but fails
/// to parse.
pub fn load_settings_file(path: &Path) -> anyhow::Result<Option<SettingsPatch>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    let patch: SettingsPatch = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
    Ok(Some(patch))
}

/// `brrtcrud.toml` next to the catalog, if it exists
pub fn auto_detect_settings_path(catalog_path: &Path) -> Option<PathBuf> {
    let path = catalog_path.parent()?.join(SETTINGS_FILE_NAME);
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Resolve the settings file path
///
/// Priority:
/// 1. Explicitly provided path (via CLI)
/// 2. Auto-detected alongside the catalog
/// 3. None
pub fn resolve_settings_path(explicit_path: Option<&Path>, catalog_path: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    auto_detect_settings_path(catalog_path)
}
