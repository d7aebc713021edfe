use super::{ExportFormat, Exporter, RenderedFile};
use crate::naming::{simple_name, to_rust_path, to_snake_case};
use crate::resource::ResourceConfiguration;
use crate::settings::Settings;
use crate::synth::{BodyStep, ContentKind, OperationSpec, Parameter, SynthesizedResource};
use askama::Template;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Field of the generated controller struct
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: String,
    pub ty: String,
}

/// Entry of the generated `ROUTES` table
#[derive(Debug, Clone)]
pub struct RouteView {
    pub methods: Vec<String>,
    pub path: String,
    pub operation: String,
    pub roles: Vec<String>,
}

/// One generated handler method
#[derive(Debug, Clone)]
pub struct HandlerView {
    pub name: String,
    pub doc: Vec<String>,
    pub params: String,
    pub returns: String,
    pub body: Vec<String>,
}

#[derive(Template)]
#[template(path = "controller.rs.txt", escape = "none")]
pub struct ControllerTemplate {
    pub catalog: String,
    pub struct_name: String,
    pub entity: String,
    pub base_path: String,
    pub fields: Vec<FieldView>,
    pub routes: Vec<RouteView>,
    pub handlers: Vec<HandlerView>,
}

#[derive(Debug, Clone)]
pub struct ModuleView {
    pub module: String,
    pub struct_name: String,
}

#[derive(Template)]
#[template(path = "mod.rs.txt", escape = "none")]
pub struct ModRsTemplate {
    pub catalog: String,
    pub modules: Vec<ModuleView>,
}

fn rust_type(type_id: &str) -> String {
    to_rust_path(type_id)
}

fn parameter(param: &Parameter) -> String {
    let ty = rust_type(&param.type_id);
    if param.required || param.default_value.is_some() {
        format!("{}: {ty}", param.name)
    } else {
        format!("{}: Option<{ty}>", param.name)
    }
}

fn method_name(accessor: &str) -> String {
    to_snake_case(accessor)
}

fn wrapper(config: &ResourceConfiguration) -> String {
    config
        .response_wrapper_type
        .as_deref()
        .map(rust_type)
        .unwrap_or_default()
}

/// Rust statement for one body step
pub fn render_step(step: &BodyStep, config: &ResourceConfiguration) -> String {
    match step {
        BodyStep::ReadOwner { id, into } => format!(
            "let mut {into} = self.data_accessor.read({id})?.ok_or(CrudError::EntityNotFound)?;"
        ),
        BodyStep::MapTo {
            source,
            shape,
            into,
        } => format!(
            "let {into} = self.data_mapper.map::<_, {}>({source})?;",
            rust_type(shape)
        ),
        BodyStep::Assign { source, into } => format!("let {into} = {source};"),
        BodyStep::AssignId { target, id } => format!("let {target} = {target}.with_id({id});"),
        BodyStep::Create { source, into } => {
            format!("let {into} = self.data_accessor.create({source})?;")
        }
        BodyStep::Update { source, into } => {
            format!("let mut {into} = self.data_accessor.update({source})?;")
        }
        BodyStep::Merge {
            original,
            changes,
            into,
        } => format!("let {into} = self.data_merger.merge({original}, {changes})?;"),
        BodyStep::DeleteById { id } => format!("self.data_accessor.delete_by_id({id})?;"),
        BodyStep::ListAll { into } => format!("let {into} = self.data_accessor.list()?;"),
        BodyStep::BuildFilter {
            filter,
            shape,
            into,
        } => format!(
            "let {into} = self.search_filter_builder.build::<{}>({filter}.as_deref())?;",
            rust_type(shape)
        ),
        BodyStep::SearchPage {
            filter,
            page,
            size,
            into,
        } => format!("let {into} = self.data_accessor.search({filter}, {page}, {size})?;"),
        BodyStep::MapEach {
            source,
            shape,
            into,
        } => format!(
            "let {into} = {source}.try_map(|item| self.data_mapper.map::<_, {}>(item))?;",
            rust_type(shape)
        ),
        BodyStep::ReadAccessor {
            target,
            accessor,
            into,
        } => format!("let {into} = {target}.{}();", method_name(accessor)),
        BodyStep::InvokeAccessor {
            target,
            accessor,
            value,
        } => match value {
            Some(value) => format!("{target}.{}({value}.into());", method_name(accessor)),
            None => format!("{target}.{}(None);", method_name(accessor)),
        },
        BodyStep::ResolveReference {
            related_type,
            id,
            into,
        } => format!(
            "let {into} = self.reference_resolver.reference::<{}>({id})?;",
            rust_type(related_type)
        ),
        BodyStep::ExtractId {
            source,
            accessor,
            into,
        } => format!("let {into} = {source}.{}();", method_name(accessor)),
        BodyStep::Delegate {
            operation,
            arguments,
            into,
        } => {
            let call = format!("self.{operation}({})?", arguments.join(", "));
            match into {
                Some(into) => format!("let {into} = {call};"),
                None => format!("{call};"),
            }
        }
        BodyStep::WrapContent {
            source,
            content,
            into,
        } => {
            let setter = match content {
                ContentKind::Item => "set_item",
                ContentKind::Sequence => "set_sequence",
                ContentKind::Page => "set_page",
            };
            format!(
                "let mut {into} = {}::default(); {into}.{setter}({source});",
                wrapper(config)
            )
        }
        BodyStep::WrapNoContent { into } => format!(
            "let mut {into} = {}::default(); {into}.no_content();",
            wrapper(config)
        ),
        BodyStep::Return { source } => format!("Ok({source})"),
        BodyStep::ReturnEmpty => "Ok(())".to_string(),
    }
}

fn handler(op: &OperationSpec, config: &ResourceConfiguration) -> HandlerView {
    let mut doc = vec![format!(
        "`{}` → {} {}",
        op.route_label(),
        op.response.status_on_success.as_u16(),
        op.response
            .status_on_success
            .canonical_reason()
            .unwrap_or_default()
    )];
    if let Some(security) = &op.security {
        doc.push(String::new());
        doc.push(format!("Requires `{security}`"));
    }
    for param in op.parameters.iter().filter(|p| p.default_value.is_some()) {
        doc.push(format!(
            "`{}` defaults to {}",
            param.name,
            param.default_value.as_deref().unwrap_or_default()
        ));
    }

    HandlerView {
        name: op.operation_name.clone(),
        doc,
        params: op
            .parameters
            .iter()
            .map(parameter)
            .collect::<Vec<_>>()
            .join(", "),
        returns: rust_type(&op.response.declared_type),
        body: op.body.iter().map(|step| render_step(step, config)).collect(),
    }
}

/// Module name and struct name of a controller
fn controller_names(controller_name: &str) -> (String, String) {
    let struct_name = simple_name(controller_name).to_string();
    (to_snake_case(&struct_name), struct_name)
}

fn render_controller(
    catalog: &str,
    resource: &SynthesizedResource,
) -> anyhow::Result<(ModuleView, RenderedFile)> {
    let config = &resource.configuration;
    let operations = &resource.operations;
    let (module, struct_name) = controller_names(&operations.controller_name);

    let template = ControllerTemplate {
        catalog: catalog.to_string(),
        struct_name: struct_name.clone(),
        entity: config.resource_type_id.clone(),
        base_path: config.route_base_path.clone(),
        fields: operations
            .scaffolding
            .fields
            .iter()
            .map(|f| FieldView {
                name: f.name.clone(),
                ty: rust_type(&f.type_id),
            })
            .collect(),
        routes: operations
            .operations
            .iter()
            .map(|op| RouteView {
                methods: op.methods.iter().map(|m| m.as_str().to_string()).collect(),
                path: op.path.clone(),
                operation: op.operation_name.clone(),
                roles: op
                    .security
                    .as_ref()
                    .map(|s| s.required_roles.clone())
                    .unwrap_or_default(),
            })
            .collect(),
        handlers: operations
            .operations
            .iter()
            .map(|op| handler(op, config))
            .collect(),
    };

    let file = RenderedFile {
        relative_path: PathBuf::from(format!("{module}.rs")),
        contents: template.render()?,
    };
    Ok((
        ModuleView {
            module,
            struct_name,
        },
        file,
    ))
}

/// Templates indent with four spaces; swap each leading level for `indent`
fn reindent(contents: &str, indent: &str) -> String {
    if indent == TEMPLATE_INDENT {
        return contents.to_string();
    }
    let mut out = String::with_capacity(contents.len());
    for line in contents.lines() {
        let mut rest = line;
        while let Some(stripped) = rest.strip_prefix(TEMPLATE_INDENT) {
            out.push_str(indent);
            rest = stripped;
        }
        out.push_str(rest);
        out.push('\n');
    }
    out
}

const TEMPLATE_INDENT: &str = "    ";

/// Renders one controller module per resource plus `mod.rs`
pub struct RustExporter;

impl Exporter for RustExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Rust
    }

    fn render(
        &self,
        catalog: &str,
        settings: &Settings,
        resources: &[SynthesizedResource],
    ) -> anyhow::Result<Vec<RenderedFile>> {
        let mut files = Vec::with_capacity(resources.len() + 1);
        let mut modules = Vec::with_capacity(resources.len());
        for resource in resources {
            let (module, mut file) = render_controller(catalog, resource)?;
            file.contents = reindent(&file.contents, &settings.indentation);
            modules.push(module);
            files.push(file);
        }
        let mod_rs = ModRsTemplate {
            catalog: catalog.to_string(),
            modules,
        }
        .render()?;
        files.push(RenderedFile {
            relative_path: PathBuf::from("mod.rs"),
            contents: reindent(&mod_rs, &settings.indentation),
        });
        Ok(files)
    }
}

/// Run `rustfmt` over generated sources
///
/// `BRRTCRUD_RUSTFMT_BIN` overrides the binary.
pub fn format_sources(files: &[PathBuf]) -> anyhow::Result<()> {
    if files.is_empty() {
        return Ok(());
    }
    let rustfmt = std::env::var("BRRTCRUD_RUSTFMT_BIN").unwrap_or_else(|_| "rustfmt".to_string());
    let status = Command::new(rustfmt)
        .args(["--edition", "2021"])
        .args(files.iter().map(PathBuf::as_path).map(Path::as_os_str))
        .status()?;
    if !status.success() {
        anyhow::bail!("rustfmt failed");
    }
    Ok(())
}
