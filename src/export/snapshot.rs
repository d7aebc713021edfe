use super::{ExportFormat, Exporter, RenderedFile};
use crate::settings::Settings;
use crate::synth::SynthesizedResource;
use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;

/// `generated-rest.json` / `generated-rest.yaml`
pub const SNAPSHOT_FILE_STEM: &str = "generated-rest";

/// Persisted configuration snapshot: the settings in force plus every
/// resolved configuration and its operation set
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub catalog: &'a str,
    pub settings: &'a Settings,
    pub resources: &'a [SynthesizedResource],
}

fn snapshot_file(extension: &str, contents: String) -> RenderedFile {
    RenderedFile {
        relative_path: PathBuf::from(format!("{SNAPSHOT_FILE_STEM}.{extension}")),
        contents,
    }
}

pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(
        &self,
        catalog: &str,
        settings: &Settings,
        resources: &[SynthesizedResource],
    ) -> anyhow::Result<Vec<RenderedFile>> {
        let snapshot = Snapshot {
            catalog,
            settings,
            resources,
        };
        let mut contents =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize JSON snapshot")?;
        contents.push('\n');
        Ok(vec![snapshot_file("json", contents)])
    }
}

pub struct YamlExporter;

impl Exporter for YamlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Yaml
    }

    fn render(
        &self,
        catalog: &str,
        settings: &Settings,
        resources: &[SynthesizedResource],
    ) -> anyhow::Result<Vec<RenderedFile>> {
        let snapshot = Snapshot {
            catalog,
            settings,
            resources,
        };
        let contents =
            serde_yaml::to_string(&snapshot).context("Failed to serialize YAML snapshot")?;
        Ok(vec![snapshot_file("yaml", contents)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceConfiguration;
    use crate::synth::{synthesize, SynthesisOptions};

    fn resources() -> Vec<SynthesizedResource> {
        let configuration = ResourceConfiguration::new("shop.Order", "/orders");
        let operations = synthesize(&configuration, &SynthesisOptions::default());
        vec![SynthesizedResource {
            configuration,
            operations,
        }]
    }

    #[test]
    fn json_snapshot_carries_operations() {
        let files = JsonExporter
            .render("shop", &Settings::default(), &resources())
            .unwrap();
        assert_eq!(files[0].relative_path, PathBuf::from("generated-rest.json"));

        let value: serde_json::Value = serde_json::from_str(&files[0].contents).unwrap();
        let ops = &value["resources"][0]["operations"]["operations"];
        assert_eq!(ops.as_array().unwrap().len(), 7);
        assert_eq!(ops[0]["methods"][0], "POST");
        assert_eq!(ops[4]["response"]["status_on_success"], 204);
        assert_eq!(value["catalog"], "shop");
        assert_eq!(value["settings"]["page_size"], 20);
    }

    #[test]
    fn yaml_snapshot_parses_back() {
        let files = YamlExporter
            .render("shop", &Settings::default(), &resources())
            .unwrap();
        assert_eq!(files[0].relative_path, PathBuf::from("generated-rest.yaml"));
        let value: serde_yaml::Value = serde_yaml::from_str(&files[0].contents).unwrap();
        assert_eq!(
            value["resources"][0]["configuration"]["route_base_path"],
            serde_yaml::Value::from("/orders")
        );
    }
}
