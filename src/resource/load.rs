use super::types::Catalog;
use crate::naming::slugify;
use anyhow::Context;
use std::path::Path;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false)
}

/// Load a resource catalog from a YAML or JSON file
///
/// The extension decides the format: `.yaml`/`.yml` is YAML, anything else JSON.
/// The returned catalog's `title` is slugified; when the file has no title the
/// file stem is used.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let mut catalog = parse_catalog(&content, is_yaml(path))
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;

    if catalog.title.trim().is_empty() {
        catalog.title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    catalog.title = slugify(&catalog.title);

    tracing::debug!(
        path = %path.display(),
        title = %catalog.title,
        types = catalog.types.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse catalog text
pub fn parse_catalog(content: &str, yaml: bool) -> anyhow::Result<Catalog> {
    let catalog = if yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
title: Shop API
settings:
  class_name_prefix: Api
types:
  - id: shop.OrderModel
    markers:
      - name: CrudResource
        values: { value: /orders, entity: shop.OrderModel }
    fields:
      - { name: id, type: i32, markers: [{ name: Id }] }
"#;

    #[test]
    fn loads_yaml_and_slugifies_title() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.title, "shop_api");
        assert_eq!(catalog.types.len(), 1);
        assert_eq!(catalog.types[0].fields[0].ty, "i32");
        assert_eq!(
            catalog.settings.unwrap().class_name_prefix.as_deref(),
            Some("Api")
        );
    }

    #[test]
    fn loads_json_and_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Billing.json");
        std::fs::write(&path, r#"{"types": [{"id": "billing.Invoice"}]}"#).unwrap();
        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.title, "billing");
        assert_eq!(catalog.types[0].id, "billing.Invoice");
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "types: [ { id: ").unwrap();
        let err = load_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.yaml"));
    }
}
